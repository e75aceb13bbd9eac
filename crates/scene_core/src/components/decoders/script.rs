use serde::Deserialize;
use serde_json::{Map, Value};

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_true, ensure};

/// Reference to an editor-side script asset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRef {
    #[serde(default)]
    pub script_id: String,
    /// `"external"` or `"inline"`.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub code_hash: Option<String>,
}

/// Script attachment. Parameters stay as raw JSON; scripting hosts interpret them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, alias = "script_path")]
    pub script_path: Option<String>,
    #[serde(default)]
    pub script_ref: Option<ScriptRef>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl Script {
    /// Runtime path: the compiled `scriptPath` first, then the referenced asset path.
    pub fn runtime_path(&self) -> Option<&str> {
        self.script_path.as_deref().or_else(|| {
            self.script_ref
                .as_ref()
                .and_then(|script_ref| script_ref.path.as_deref())
        })
    }

    pub fn is_external(&self) -> bool {
        self.script_ref
            .as_ref()
            .is_some_and(|script_ref| script_ref.source == "external")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptDecoder;

impl ComponentDecoder for ScriptDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["Script"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::none()
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let script: Script = decode_payload(value)?;
        ensure(
            script.runtime_path().is_some() || script.code.is_some(),
            "",
            "one of scriptPath, scriptRef.path or code is required",
        )?;
        Ok(Box::new(script))
    }
}
