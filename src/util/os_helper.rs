/// Real name of the OS user, or the login name when it is not set.
///
/// Author fallback for generated pages when `[site] author` is missing.
pub fn get_name() -> String {
    let name = whoami::realname();
    if name.is_empty() {
        return whoami::username();
    }
    name
}