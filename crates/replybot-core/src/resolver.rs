use crate::document::Target;

/// Find the configured target for a source conversation id.
///
/// Ids are not enforced unique: the FIRST match in list order wins and later
/// duplicates are unreachable. Callers must not reorder.
pub fn resolve<'a>(targets: &'a [Target], source_id: &str) -> Option<&'a Target> {
    targets.iter().find(|t| t.id == source_id)
}
