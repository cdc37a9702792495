use serde::Deserialize;

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30u64
}

fn default_download_directory() -> String {
    "downloads".to_string()
}

fn default_yt_dlp_path() -> String {
    "yt-dlp".to_string()
}

fn default_ftp_port() -> u16 {
    22u16
}

fn default_ftp_target_dir() -> String {
    ".".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SftpCredentials {
    #[serde(rename = "ftp_host")]
    pub(crate) host: String,
    #[serde(rename = "ftp_user")]
    pub(crate) username: String,
    #[serde(rename = "ftp_pass")]
    pub(crate) password: String,
    #[serde(rename = "ftp_target_dir", default = "default_ftp_target_dir")]
    pub(crate) target_dir: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    pub(crate) bot_token: String,
    #[serde(default)]
    pub(crate) allowed_user_id: Option<String>,
    #[serde(default)]
    pub(crate) proxy_url: Option<String>,
    #[serde(default = "default_yt_dlp_path")]
    pub(crate) yt_dlp_path: String,
    #[serde(default = "default_download_directory")]
    pub(crate) download_directory: String,
    // Numeric values can't live in the flattened struct, envy only hands out strings there.
    #[serde(default = "default_ftp_port")]
    pub(crate) ftp_port: u16,
    #[serde(default = "default_bind_address")]
    pub(crate) bind_address: String,
    #[serde(default = "default_shutdown_timeout")]
    pub(crate) shutdown_timeout: u64,
    #[serde(flatten)]
    pub(crate) sftp: SftpCredentials,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        match Self::from_vars(std::env::vars()) {
            Ok(config) => config,
            Err(error) => panic!("Missing environment variable: {:#?}", error),
        }
    }

    pub(crate) fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, envy::Error> {
        envy::from_iter(vars)
    }
}
