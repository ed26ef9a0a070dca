use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Expands a leading `~` or `~/`. `~user` forms are left alone.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => return PathBuf::from(path),
    };

    match home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Shortens paths under the home directory for messages.
pub fn contract_tilde(path: &Path) -> String {
    match home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let home = home_dir().unwrap();

        assert_eq!(expand_tilde("/usr/bin"), PathBuf::from("/usr/bin"));
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(
            expand_tilde("~/.config/galendar/config.lua"),
            home.join(".config/galendar/config.lua")
        );
        assert_eq!(expand_tilde("~username/bin"), PathBuf::from("~username/bin"));
    }

    #[test]
    fn test_contract_tilde() {
        let home = home_dir().unwrap();

        assert_eq!(contract_tilde(Path::new("/var/log")), "/var/log");
        assert_eq!(contract_tilde(&home), "~");
        assert_eq!(
            contract_tilde(&home.join(".local/share/galendar/oauth")),
            "~/.local/share/galendar/oauth"
        );
    }
}
