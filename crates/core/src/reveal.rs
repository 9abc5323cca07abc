use crate::error::RevealError;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Program and arguments that show `path` in the platform file manager.
pub fn reveal_command(path: &Path) -> (&'static str, Vec<OsString>) {
    if cfg!(target_os = "windows") {
        let mut select = OsString::from("/select,");
        select.push(path.as_os_str());
        ("explorer", vec![select])
    } else if cfg!(target_os = "macos") {
        ("open", vec![OsString::from("-R"), path.as_os_str().to_owned()])
    } else {
        let folder = path.parent().unwrap_or(path);
        ("xdg-open", vec![folder.as_os_str().to_owned()])
    }
}

pub async fn reveal_in_file_manager(path: &Path) -> Result<(), RevealError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(RevealError::NotFound(path.display().to_string()));
    }

    let (program, args) = reveal_command(path);
    info!(program, path = %path.display(), "revealing file");
    // Explorer exits non-zero even on success, so only spawn failures count.
    Command::new(program).args(&args).spawn()?.wait().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_targets_the_file_or_its_folder() {
        let path = Path::new("/docs/reports/q1.pdf");
        let (program, args) = reveal_command(path);

        assert!(!program.is_empty());
        assert_eq!(args.len(), if cfg!(target_os = "macos") { 2 } else { 1 });
        let target = args.last().map(|arg| arg.to_string_lossy().to_string()).unwrap_or_default();
        if cfg!(any(target_os = "windows", target_os = "macos")) {
            assert!(target.ends_with("q1.pdf"));
        } else {
            assert_eq!(target, "/docs/reports");
        }
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let result = reveal_in_file_manager(Path::new("/definitely/not/here.pdf")).await;
        assert!(matches!(result, Err(RevealError::NotFound(_))));
    }
}
