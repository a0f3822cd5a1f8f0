use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use yuka_nls::Encoding;

use crate::error::{ScriptError, ScriptResult};

/// XOR key applied to every byte of an encrypted YKS data sector.
pub const DEFAULT_SCRIPT_KEY: u8 = 0xAA;

/// Settings shared by the script pipeline and the archive container.
///
/// Every component takes a reference to one of these at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YukaConfig {
    /// Encoding of data-sector strings and archive file names.
    pub nls: Encoding,
    pub script_key: u8,
    /// Whether the assembler obfuscates the data sector.
    pub encrypt_scripts: bool,
    pub externalize: Option<ExternalizeConfig>,
}

impl Default for YukaConfig {
    fn default() -> Self {
        Self {
            nls: Encoding::ShiftJis,
            script_key: DEFAULT_SCRIPT_KEY,
            encrypt_scripts: true,
            externalize: None,
        }
    }
}

impl YukaConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let config: YukaConfig = serde_yaml::from_str(&txt).context("parse config yaml")?;
        if let Some(ext) = &config.externalize {
            ext.compile().context("externalize rules")?;
        }
        Ok(config)
    }
}

/// Which string literals the decompiler moves into the string table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalizeConfig {
    /// Regex over call names; string arguments of matching calls are externalized.
    pub functions: String,
    /// Strings matching this regex stay inline (file names, resource ids).
    pub exclude: Option<String>,
    pub key_prefix: String,
}

impl Default for ExternalizeConfig {
    fn default() -> Self {
        Self {
            functions: r"^(StrOut|StrOutNW|StrOutNWC|SetName)$".to_string(),
            exclude: Some(r"^[\w./\\-]*\.\w{2,4}$".to_string()),
            key_prefix: "T".to_string(),
        }
    }
}

pub(crate) struct ExternalizeRules {
    pub functions: Regex,
    pub exclude: Option<Regex>,
    pub key_prefix: String,
}

impl ExternalizeRules {
    pub fn wants(&self, function: &str, text: &str) -> bool {
        if !self.functions.is_match(function) {
            return false;
        }
        match &self.exclude {
            Some(re) => !re.is_match(text),
            None => true,
        }
    }
}

impl ExternalizeConfig {
    pub(crate) fn compile(&self) -> ScriptResult<ExternalizeRules> {
        let functions = Regex::new(&self.functions)
            .map_err(|e| ScriptError::Invalid(format!("functions pattern: {e}")))?;
        let exclude = match &self.exclude {
            Some(p) => Some(
                Regex::new(p).map_err(|e| ScriptError::Invalid(format!("exclude pattern: {e}")))?,
            ),
            None => None,
        };
        Ok(ExternalizeRules {
            functions,
            exclude,
            key_prefix: self.key_prefix.clone(),
        })
    }
}

/// Convenience builder for [`YukaConfig`].
pub struct YukaConfigBuilder {
    config: YukaConfig,
}

impl YukaConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Default::default(),
        }
    }

    pub fn with_nls(mut self, nls: Encoding) -> Self {
        self.config.nls = nls;
        self
    }

    pub fn with_script_key(mut self, key: u8) -> Self {
        self.config.script_key = key;
        self
    }

    pub fn with_encryption(mut self, encrypt: bool) -> Self {
        self.config.encrypt_scripts = encrypt;
        self
    }

    pub fn with_externalize(mut self, externalize: ExternalizeConfig) -> Self {
        self.config.externalize = Some(externalize);
        self
    }

    pub fn get(self) -> YukaConfig {
        self.config
    }
}

impl Default for YukaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
