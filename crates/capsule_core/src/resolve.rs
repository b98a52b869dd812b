use capsule_logging::capsule_debug;
use url::Url;

/// Resolve `reference` against `base`.
///
/// References carrying a scheme separator are returned untouched. Anything
/// else goes through standard hierarchical resolution; the `url` crate
/// handles non-special schemes with an authority, so no scheme swapping is
/// needed. If the base itself does not parse, the reference is returned as is.
pub fn resolve_reference(base: &str, reference: &str) -> String {
    let reference = reference.trim();
    if reference.contains("://") {
        return reference.to_string();
    }
    match Url::parse(base).and_then(|base| base.join(reference)) {
        Ok(url) => url.into(),
        Err(err) => {
            capsule_debug!("could not resolve {reference:?} against {base:?}: {err}");
            reference.to_string()
        }
    }
}
