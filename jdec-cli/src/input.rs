//! YAML class descriptions accepted by the command line tool.

use std::fs;
use std::path::{Path, PathBuf};

use jdec_decompiler::MethodCode;
use jdec_ir::{Locals, TypeError, TypeSignature};
use jdec_isa::{AsmError, Constant, DecodeError, assemble, decode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid class description: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("method {method}: {source}")]
    Asm { method: String, source: AsmError },

    #[error("method {method}: {source}")]
    Decode { method: String, source: DecodeError },

    #[error("method {method}: local {name}: {source}")]
    Type {
        method: String,
        name: String,
        source: TypeError,
    },

    #[error("method {0}: either `code` or `bytecode` is required")]
    NoCode(String),

    #[error("method {method}: invalid hex byte {text:?}")]
    Hex { method: String, text: String },
}

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Deserialize)]
pub struct ClassSource {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodSource>,
}

#[derive(Debug, Deserialize)]
pub struct MethodSource {
    pub name: String,
    pub descriptor: Option<String>,
    #[serde(default)]
    pub locals: Vec<LocalSource>,
    #[serde(default)]
    pub constants: Vec<ConstantSource>,
    /// Assembly lines.
    pub code: Option<Vec<String>>,
    /// Hex-encoded bytecode, whitespace ignored.
    pub bytecode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocalSource {
    pub index: u16,
    pub name: String,
    /// Field descriptor, e.g. `I` or `[Ljava/lang/String;`.
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConstantSource {
    Int(i32),
    String(String),
}

impl From<ConstantSource> for Constant {
    fn from(source: ConstantSource) -> Self {
        match source {
            ConstantSource::Int(v) => Constant::Int(v),
            ConstantSource::String(s) => Constant::String(s),
        }
    }
}

impl ClassSource {
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Assemble or decode every method.
    pub fn methods(&self) -> Result<Vec<MethodCode>> {
        self.methods.iter().map(MethodSource::to_code).collect()
    }
}

impl MethodSource {
    pub fn to_code(&self) -> Result<MethodCode> {
        let insns = match (&self.code, &self.bytecode) {
            (Some(lines), _) => assemble(lines.as_slice()).map_err(|source| CliError::Asm {
                method: self.name.clone(),
                source,
            })?,
            (None, Some(hex)) => {
                let bytes = parse_hex(hex).map_err(|text| CliError::Hex {
                    method: self.name.clone(),
                    text,
                })?;
                decode(&bytes).map_err(|source| CliError::Decode {
                    method: self.name.clone(),
                    source,
                })?
            }
            (None, None) => return Err(CliError::NoCode(self.name.clone())),
        };

        let mut locals = Locals::new();
        for local in &self.locals {
            let ty = TypeSignature::parse(&local.ty).map_err(|source| CliError::Type {
                method: self.name.clone(),
                name: local.name.clone(),
                source,
            })?;
            locals.declare(local.index, local.name.clone(), ty);
        }

        Ok(MethodCode {
            name: self.name.clone(),
            descriptor: self.descriptor.clone(),
            locals,
            constants: self.constants.iter().cloned().map(Constant::from).collect(),
            insns,
        })
    }
}

/// Parse hex digits, ignoring whitespace. Returns the offending pair on error.
fn parse_hex(text: &str) -> std::result::Result<Vec<u8>, String> {
    let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    digits
        .chunks(2)
        .map(|pair| {
            let pair: String = pair.iter().collect();
            u8::from_str_radix(&pair, 16)
                .ok()
                .filter(|_| pair.len() == 2)
                .ok_or(pair)
        })
        .collect()
}
