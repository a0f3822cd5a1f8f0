use std::io::Write;

use anyhow::{Context, Result};

use crate::config::YukaConfig;
use crate::script::Script;

pub mod ykc;
pub mod yks;

/// A codec the asset dispatch layer can select by content or file name.
pub trait FileFormat {
    type Object;

    /// Usual file extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Whether `head` (the first bytes of `name`) looks like this format.
    fn sniff(&self, name: &str, head: &[u8]) -> bool;

    fn decode(&self, name: &str, bytes: &[u8]) -> Result<Self::Object>;

    fn encode(&self, object: &Self::Object, name_hint: &str, sink: &mut dyn Write) -> Result<()>;
}

/// `.yks` files as decompiled [`Script`]s.
pub struct ScriptFormat {
    config: YukaConfig,
}

impl ScriptFormat {
    pub fn new(config: YukaConfig) -> Self {
        Self { config }
    }
}

impl FileFormat for ScriptFormat {
    type Object = Script;

    fn extension(&self) -> &'static str {
        "yks"
    }

    fn sniff(&self, name: &str, head: &[u8]) -> bool {
        yks::is_yks(head)
            || (head.is_empty() && name.to_ascii_lowercase().ends_with(".yks"))
    }

    fn decode(&self, name: &str, bytes: &[u8]) -> Result<Script> {
        Script::from_bytes(bytes, &self.config).with_context(|| format!("decode script {name}"))
    }

    fn encode(&self, script: &Script, name_hint: &str, sink: &mut dyn Write) -> Result<()> {
        let bytes = script
            .to_bytes(&self.config)
            .with_context(|| format!("encode script {name_hint}"))?;
        sink.write_all(&bytes)
            .with_context(|| format!("write script {name_hint}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Expression, FunctionCall, Statement};

    #[test]
    fn script_format_roundtrip() {
        let format = ScriptFormat::new(YukaConfig::default());
        let script = Script::new(vec![Statement::Call(FunctionCall::new(
            "Wait",
            vec![Expression::Integer(30)],
        ))]);
        let mut out = Vec::new();
        format.encode(&script, "a.yks", &mut out).unwrap();
        assert!(format.sniff("a.yks", &out[..8]));
        assert!(!format.sniff("a.png", b"\x89PNG"));
        let back = format.decode("a.yks", &out).unwrap();
        assert_eq!(back, script);
    }
}
