use super::AssistantGateway;
use std::path::Path;

/// Backend that answers locally without any model. Useful for trying the
/// window out when no assistant server is running.
pub struct OfflineGateway;

impl AssistantGateway for OfflineGateway {
    fn name(&self) -> &str {
        "offline"
    }

    fn process_text(&self, text: &str) -> Result<String, String> {
        Ok(format!("(offline) You said: {}", text))
    }

    fn process_image(&self, path: &Path) -> Result<String, String> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| format!("Not a file: {}", path.display()))?;
        Ok(format!("(offline) Received image {}", name))
    }

    fn process_voice(&self, _path: &Path) -> Result<String, String> {
        Ok("(offline) voice input".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_text_and_names_images() {
        let gw = OfflineGateway;
        assert_eq!(gw.process_text("hola").unwrap(), "(offline) You said: hola");
        assert_eq!(
            gw.process_image(Path::new("/tmp/cat.png")).unwrap(),
            "(offline) Received image cat.png"
        );
        assert!(gw.process_image(Path::new("/")).is_err());
    }
}
