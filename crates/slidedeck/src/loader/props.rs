use eframe::egui::Color32;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use super::LoadError;
use crate::widget::{self, Placement, PosHint};

/// Typed, consuming access to a node's properties. Whatever is left when
/// [`PropReader::finish`] runs is an unknown property.
pub struct PropReader<'a> {
    node: &'a str,
    tag: &'a str,
    props: Mapping,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Hex(String),
    Components(Vec<f32>),
}

impl<'a> PropReader<'a> {
    pub fn new(node: &'a str, tag: &'a str, props: Mapping) -> Self {
        Self { node, tag, props }
    }

    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, LoadError> {
        match self.props.remove(key) {
            None => Ok(None),
            Some(value) => serde_yaml::from_value(value)
                .map(Some)
                .map_err(|e| self.invalid(key, e.to_string())),
        }
    }

    pub fn require<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, LoadError> {
        self.take(key)?
            .ok_or_else(|| self.invalid(key, "required".to_string()))
    }

    pub fn color(&mut self, key: &str) -> Result<Option<Color32>, LoadError> {
        let Some(value) = self.take::<ColorValue>(key)? else {
            return Ok(None);
        };
        let color = match &value {
            ColorValue::Hex(s) => widget::parse_hex_color(s),
            ColorValue::Components(c) => widget::color_from_components(c),
        };
        color
            .map(Some)
            .ok_or_else(|| self.invalid(key, "expected #rrggbb[aa] or [r, g, b, a?] in 0..1".to_string()))
    }

    pub fn require_color(&mut self, key: &str) -> Result<Color32, LoadError> {
        self.color(key)?
            .ok_or_else(|| self.invalid(key, "required".to_string()))
    }

    pub fn positive(&mut self, key: &str) -> Result<Option<f32>, LoadError> {
        match self.take::<f32>(key)? {
            Some(v) if v <= 0.0 => Err(self.invalid(key, format!("must be positive, got {v}"))),
            other => Ok(other),
        }
    }

    pub fn placement(&mut self) -> Result<Placement, LoadError> {
        let mut placement = Placement::default();
        if let Some(pos_hint) = self.take::<PosHint>("pos_hint")? {
            placement.pos_hint = pos_hint;
        }
        if let Some(size_hint) = self.take::<[f32; 2]>("size_hint")? {
            if size_hint.iter().any(|v| *v < 0.0) {
                return Err(self.invalid("size_hint", "fractions must not be negative".to_string()));
            }
            placement.size_hint = size_hint;
        }
        Ok(placement)
    }

    pub fn finish(self) -> Result<(), LoadError> {
        match self.props.iter().next().map(|(key, _)| key) {
            None => Ok(()),
            Some(key) => Err(LoadError::UnknownProperty {
                node: self.node.to_string(),
                tag: self.tag.to_string(),
                key: key_name(key),
            }),
        }
    }

    pub fn invalid(&self, key: &str, message: String) -> LoadError {
        LoadError::InvalidProperty {
            node: self.node.to_string(),
            key: key.to_string(),
            message,
        }
    }
}

pub(super) fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "?".to_string()),
    }
}
