//! Tag name to constructor table, plus the user templates layered on top.

use serde_yaml::{Mapping, Value};

use super::props::{PropReader, key_name};
use super::{LoadError, RawNode};
use crate::theme::Theme;
use crate::widget::{
    HAlign, ImageFit, ImageProps, LabelProps, RectangleProps, VAlign, WidgetKind,
};

/// What a tag turns into once its properties are read.
#[derive(Debug, Clone)]
pub enum Built {
    Slides(DeckProps),
    Slide(SlideProps),
    Background,
    Foreground,
    Widget(WidgetKind),
}

#[derive(Debug, Clone, Default)]
pub struct DeckProps {
    pub title: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SlideProps {
    pub title: String,
    pub is_section: bool,
    pub background: Option<eframe::egui::Color32>,
}

pub type Constructor = fn(&mut PropReader<'_>) -> Result<Built, LoadError>;

const BUILTINS: &[(&str, Constructor)] = &[
    ("Slides", build_slides),
    ("Slide", build_slide),
    ("SlidesBackground", build_background),
    ("SlidesForeground", build_foreground),
    ("FloatLayout", build_group),
    ("Label", build_label),
    ("Image", build_image),
    ("Rectangle", build_rectangle),
];

pub fn builtin(tag: &str) -> Option<Constructor> {
    BUILTINS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, ctor)| *ctor)
}

fn build_slides(r: &mut PropReader<'_>) -> Result<Built, LoadError> {
    let theme = r.take::<String>("theme")?;
    if let Some(name) = &theme {
        if Theme::from_name(name).name != *name {
            return Err(r.invalid(
                "theme",
                format!("unknown theme `{name}`, expected `dark` or `light`"),
            ));
        }
    }
    Ok(Built::Slides(DeckProps {
        title: r.take("title")?,
        theme,
    }))
}

fn build_slide(r: &mut PropReader<'_>) -> Result<Built, LoadError> {
    Ok(Built::Slide(SlideProps {
        title: r.take("title")?.unwrap_or_default(),
        is_section: r.take("is_section")?.unwrap_or(false),
        background: r.color("background")?,
    }))
}

fn build_background(_: &mut PropReader<'_>) -> Result<Built, LoadError> {
    Ok(Built::Background)
}

fn build_foreground(_: &mut PropReader<'_>) -> Result<Built, LoadError> {
    Ok(Built::Foreground)
}

fn build_group(_: &mut PropReader<'_>) -> Result<Built, LoadError> {
    Ok(Built::Widget(WidgetKind::Group))
}

fn build_label(r: &mut PropReader<'_>) -> Result<Built, LoadError> {
    let defaults = LabelProps::default();
    Ok(Built::Widget(WidgetKind::Label(LabelProps {
        text: r.take("text")?.unwrap_or_default(),
        font_size: r.positive("font_size")?.unwrap_or(defaults.font_size),
        color: r.color("color")?,
        halign: r.take::<HAlign>("halign")?.unwrap_or_default(),
        valign: r.take::<VAlign>("valign")?.unwrap_or_default(),
        monospace: r.take("monospace")?.unwrap_or(false),
    })))
}

fn build_image(r: &mut PropReader<'_>) -> Result<Built, LoadError> {
    Ok(Built::Widget(WidgetKind::Image(ImageProps {
        source: r.require("source")?,
        fit: r.take::<ImageFit>("fit")?.unwrap_or_default(),
    })))
}

fn build_rectangle(r: &mut PropReader<'_>) -> Result<Built, LoadError> {
    Ok(Built::Widget(WidgetKind::Rectangle(RectangleProps {
        color: r.require_color("color")?,
        radius: r.take("radius")?.unwrap_or(0.0),
    })))
}

/// A named widget class declared in `templates.kv`, derived from a built-in
/// tag or an earlier template.
#[derive(Debug, Clone)]
pub struct Template {
    pub base: String,
    pub props: Mapping,
    pub children: Vec<RawNode>,
}

/// Tag lookup: templates first, then built-ins.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    templates: Vec<(String, Template)>,
}

impl Registry {
    pub fn with_templates(source: &str) -> Result<Self, LoadError> {
        let mut registry = Self::default();
        if source.trim().is_empty() {
            return Ok(registry);
        }
        let value: Value = serde_yaml::from_str(source).map_err(|e| LoadError::Template {
            name: "templates".to_string(),
            message: e.to_string(),
        })?;
        let entries = match value {
            Value::Null => return Ok(registry),
            Value::Mapping(m) => m,
            _ => {
                return Err(LoadError::Template {
                    name: "templates".to_string(),
                    message: "expected a mapping of template names".to_string(),
                });
            }
        };

        for (key, body) in entries {
            let name = key_name(&key);
            registry.define(&name, body)?;
        }
        Ok(registry)
    }

    fn define(&mut self, name: &str, body: Value) -> Result<(), LoadError> {
        let fail = |message: String| LoadError::Template {
            name: name.to_string(),
            message,
        };

        if builtin(name).is_some() {
            return Err(fail("shadows a built-in widget".to_string()));
        }
        if self.template(name).is_some() {
            return Err(fail("defined twice".to_string()));
        }
        let Value::Mapping(mut props) = body else {
            return Err(fail("expected a mapping".to_string()));
        };
        let base = match props.remove("base") {
            Some(Value::String(base)) => base,
            Some(_) => return Err(fail("`base` must be a widget name".to_string())),
            None => return Err(fail("missing `base`".to_string())),
        };
        if !self.is_known(&base) {
            return Err(fail(format!("unknown base `{base}`")));
        }
        let children = match props.remove("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| RawNode::parse(item, &format!("{name}/children[{i}]")))
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(fail("`children` must be a list".to_string())),
        };

        tracing::debug!(template = name, base = %base, "registered template");
        self.templates.push((
            name.to_string(),
            Template {
                base,
                props,
                children,
            },
        ));
        Ok(())
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    pub fn is_known(&self, tag: &str) -> bool {
        builtin(tag).is_some() || self.template(tag).is_some()
    }

    /// Rewrite a node whose tag is a template into its built-in base.
    /// Instance properties override template ones; template children come
    /// first.
    pub fn expand(&self, mut node: RawNode, path: &str) -> Result<RawNode, LoadError> {
        while let Some(template) = self.template(&node.tag) {
            let mut props = template.props.clone();
            for (key, value) in std::mem::take(&mut node.props) {
                props.insert(key, value);
            }
            let mut children = template.children.clone();
            children.append(&mut node.children);
            node = RawNode {
                tag: template.base.clone(),
                props,
                children,
            };
        }
        if builtin(&node.tag).is_none() {
            return Err(LoadError::UnknownWidget {
                node: path.to_string(),
                tag: node.tag,
            });
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> RawNode {
        RawNode::parse(serde_yaml::from_str(yaml).unwrap(), "test").unwrap()
    }

    #[test]
    fn test_builtin_table() {
        for tag in [
            "Slides",
            "Slide",
            "SlidesBackground",
            "SlidesForeground",
            "FloatLayout",
            "Label",
            "Image",
            "Rectangle",
        ] {
            assert!(builtin(tag).is_some(), "{tag}");
        }
        assert!(builtin("Button").is_none());
        assert!(builtin("label").is_none());
    }

    #[test]
    fn test_template_expansion_merges_props_and_children() {
        let registry = Registry::with_templates(
            "TitleSlide:\n  base: Slide\n  is_section: true\n  title: Untitled\n  children:\n    - widget: Label\n      text: header\n",
        )
        .unwrap();
        let node = raw("widget: TitleSlide\ntitle: Intro\nchildren:\n  - widget: Label\n    text: body\n");

        let expanded = registry.expand(node, "test").unwrap();
        assert_eq!(expanded.tag, "Slide");
        assert_eq!(expanded.props.get("title"), Some(&Value::from("Intro")));
        assert_eq!(expanded.props.get("is_section"), Some(&Value::Bool(true)));
        assert_eq!(expanded.children.len(), 2);
        assert_eq!(
            expanded.children[0].props.get("text"),
            Some(&Value::from("header"))
        );
    }

    #[test]
    fn test_templates_can_chain() {
        let registry = Registry::with_templates(
            "Big:\n  base: Label\n  font_size: 80\nHuge:\n  base: Big\n  font_size: 120\n",
        )
        .unwrap();
        let expanded = registry.expand(raw("widget: Huge"), "test").unwrap();
        assert_eq!(expanded.tag, "Label");
        assert_eq!(
            expanded.props.get("font_size").and_then(Value::as_u64),
            Some(120)
        );
    }

    #[test]
    fn test_template_errors() {
        assert!(matches!(
            Registry::with_templates("Label:\n  base: Label\n"),
            Err(LoadError::Template { .. })
        ));
        assert!(matches!(
            Registry::with_templates("Foo:\n  base: Nope\n"),
            Err(LoadError::Template { .. })
        ));
        assert!(matches!(
            Registry::with_templates("Foo:\n  text: hi\n"),
            Err(LoadError::Template { .. })
        ));
        // Bases must be declared first.
        assert!(Registry::with_templates("A:\n  base: B\nB:\n  base: Label\n").is_err());
    }

    #[test]
    fn test_empty_templates_file() {
        let registry = Registry::with_templates("").unwrap();
        assert!(!registry.is_known("TitleSlide"));
        assert!(registry.is_known("Slide"));
    }

    #[test]
    fn test_unknown_widget() {
        let registry = Registry::default();
        assert!(matches!(
            registry.expand(raw("widget: Button"), "test"),
            Err(LoadError::UnknownWidget { tag, .. }) if tag == "Button"
        ));
    }
}
