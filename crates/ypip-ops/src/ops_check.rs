//! Operation: test versions against a specifier.

use ypip_core::specifier::Specifier;
use ypip_core::version::Version;
use ypip_util::errors::YpipResult;

/// Each version in canonical form, with whether `spec` admits it.
///
/// Every input is parsed before anything is evaluated, so a malformed
/// version fails the whole check.
pub fn check<S: AsRef<str>>(spec: &str, versions: &[S]) -> YpipResult<Vec<(Version, bool)>> {
    let spec = Specifier::parse(spec)?;
    let versions = versions
        .iter()
        .map(|v| Version::parse(v.as_ref()))
        .collect::<YpipResult<Vec<_>>>()?;
    tracing::debug!("Checking {} version(s) against {spec}", versions.len());
    Ok(versions
        .into_iter()
        .map(|v| {
            let ok = spec.contains(&v);
            (v, ok)
        })
        .collect())
}

/// One `version ok|no` line per result.
pub fn render(results: &[(Version, bool)]) -> String {
    results
        .iter()
        .map(|(v, ok)| format!("{v} {}\n", if *ok { "ok" } else { "no" }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ypip_util::errors::YpipError;

    #[test]
    fn evaluates_each_version() {
        let results = check(">= 1.0, < 2.0, != 1.2.*", &["1.0", "v1.2.5", "1.3.1", "2.0"]).unwrap();
        assert_eq!(render(&results), "1.0 ok\n1.2.5 no\n1.3.1 ok\n2.0 no\n");
    }

    #[test]
    fn malformed_input_fails() {
        assert!(matches!(
            check("=> 1.0", &["1.0"]),
            Err(YpipError::Parse { .. })
        ));
        assert!(matches!(
            check("== 1.0", &["1.0", "one"]),
            Err(YpipError::Parse { .. })
        ));
    }
}
