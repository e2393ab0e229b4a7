//! Handler for `ypip check`.

use miette::Result;

use ypip_ops::ops_check;

pub fn exec(specifier: &str, versions: &[String]) -> Result<i32> {
    let results = ops_check::check(specifier, versions)?;
    print!("{}", ops_check::render(&results));
    Ok(if results.iter().all(|(_, ok)| *ok) { 0 } else { 1 })
}
