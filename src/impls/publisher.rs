use crate::services::SftpClient;
use request_processors::{PublishError, Publisher};
use std::path::Path;

impl Publisher for SftpClient {
    fn publish(&self, artifact_path: &Path) -> Result<(), PublishError> {
        self.upload(artifact_path).map_err(PublishError::new)?;

        Ok(())
    }
}
