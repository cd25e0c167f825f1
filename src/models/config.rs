use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub token: String,
    #[serde(default = "default_prefix")]
    pub cmd_prefix: String
}

fn default_prefix() -> String {
    "!".to_string()
}
