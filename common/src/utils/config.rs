use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_max_chunk_tokens")]
    pub max_chunk_tokens: usize,
    #[serde(default = "default_tokenizer_model")]
    pub tokenizer_model: String,
    #[serde(default = "default_nli_base_url")]
    pub nli_base_url: String,
    #[serde(default = "default_nli_model")]
    pub nli_model: String,
    #[serde(default)]
    pub hf_api_token: Option<String>,
}

fn default_pdf_dir() -> String {
    "pdf/".to_string()
}

fn default_chunk_size() -> usize {
    512
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_max_chunk_tokens() -> usize {
    500
}

fn default_tokenizer_model() -> String {
    "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2".to_string()
}

fn default_nli_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_nli_model() -> String {
    "cointegrated/rubert-tiny2".to_string()
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
