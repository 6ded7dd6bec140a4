//! Builds a [`Presentation`] from a `presentation.kv` widget tree and the
//! optional `templates.kv` next to it.
//!
//! Both files are YAML. A node is a mapping with a `widget:` tag, an
//! optional `children:` list, and properties:
//!
//! ```yaml
//! widget: Slides
//! children:
//!   - widget: Slide
//!     title: Introduction
//!     is_section: true
//!     children:
//!       - widget: Label
//!         text: Hello
//!         font_size: 96
//!         halign: center
//!         valign: middle
//! ```

pub mod props;
pub mod registry;

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::deck::{Deck, EmptyDeckError, Slide};
use crate::resources::ResourcePaths;
use crate::widget::{Placement, WidgetNode};
use props::PropReader;
use registry::{Built, Registry};

pub const PRESENTATION_FILE: &str = "presentation.kv";
pub const TEMPLATES_FILE: &str = "templates.kv";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{node}: unknown widget `{tag}`")]
    UnknownWidget { node: String, tag: String },
    #[error("{node}: expected a mapping with a `widget:` tag")]
    MissingTag { node: String },
    #[error("{node}: `{tag}` has no property `{key}`")]
    UnknownProperty {
        node: String,
        tag: String,
        key: String,
    },
    #[error("{node}: invalid `{key}`: {message}")]
    InvalidProperty {
        node: String,
        key: String,
        message: String,
    },
    #[error("{node}: `{tag}` is not allowed here")]
    Misplaced { node: String, tag: String },
    #[error("the root widget must be `Slides`, found `{tag}`")]
    InvalidRoot { tag: String },
    #[error("template `{name}`: {message}")]
    Template { name: String, message: String },
    #[error(transparent)]
    EmptyDeck(#[from] EmptyDeckError),
}

/// A node as written, before its tag is resolved.
#[derive(Debug, Clone)]
pub struct RawNode {
    pub tag: String,
    pub props: Mapping,
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn parse(value: Value, path: &str) -> Result<Self, LoadError> {
        let missing_tag = || LoadError::MissingTag {
            node: path.to_string(),
        };
        let Value::Mapping(mut props) = value else {
            return Err(missing_tag());
        };
        let tag = match props.remove("widget") {
            Some(Value::String(tag)) => tag,
            _ => return Err(missing_tag()),
        };
        let children = match props.remove("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| Self::parse(item, &format!("{path}/{tag}[{i}]")))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(LoadError::InvalidProperty {
                    node: path.to_string(),
                    key: "children".to_string(),
                    message: "expected a list of widgets".to_string(),
                });
            }
        };
        Ok(Self {
            tag,
            props,
            children,
        })
    }
}

/// Where a deck's files live on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFiles {
    pub presentation: PathBuf,
    pub templates: Option<PathBuf>,
    /// Registered as a resource search path.
    pub base_dir: PathBuf,
}

/// Accept either a deck directory or a path to its description file.
pub fn resolve_input(path: &Path) -> SourceFiles {
    let (presentation, base_dir) = if path.is_dir() {
        (path.join(PRESENTATION_FILE), path.to_path_buf())
    } else {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (path.to_path_buf(), parent)
    };
    let templates = Some(base_dir.join(TEMPLATES_FILE)).filter(|p| p.is_file());
    SourceFiles {
        presentation,
        templates,
        base_dir,
    }
}

/// A loaded deck plus everything drawn around it.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub title: String,
    pub theme: Option<String>,
    pub deck: Deck,
    /// Drawn under the slides, over the whole window.
    pub background: Vec<WidgetNode>,
    /// Drawn over the slides, followed by any stray overlay widgets.
    pub foreground: Vec<WidgetNode>,
    pub resources: ResourcePaths,
    pub source: PathBuf,
}

pub fn load(path: &Path) -> Result<Presentation, LoadError> {
    let files = resolve_input(path);
    tracing::info!(path = %files.presentation.display(), "loading presentation");

    let read = |path: &Path| {
        std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };
    let presentation = read(&files.presentation)?;
    let templates = files.templates.as_deref().map(read).transpose()?;
    if let Some(path) = &files.templates {
        tracing::debug!(path = %path.display(), "using templates");
    }

    let mut loaded = parse_presentation(&presentation, templates.as_deref(), &files.presentation)?;
    loaded.resources.add(&files.base_dir);
    if loaded.title.is_empty() {
        loaded.title = default_title(&files.base_dir);
    }
    tracing::info!(slides = loaded.deck.max_index(), "presentation loaded");
    Ok(loaded)
}

/// Build from in-memory sources; `base_dir` becomes the resource search path.
pub fn load_str(
    presentation: &str,
    templates: Option<&str>,
    base_dir: &Path,
) -> Result<Presentation, LoadError> {
    let mut loaded = parse_presentation(presentation, templates, &base_dir.join(PRESENTATION_FILE))?;
    loaded.resources.add(base_dir);
    Ok(loaded)
}

fn parse_presentation(
    source: &str,
    templates: Option<&str>,
    path: &Path,
) -> Result<Presentation, LoadError> {
    let registry = match templates {
        Some(text) => Registry::with_templates(text)?,
        None => Registry::default(),
    };
    let value: Value = serde_yaml::from_str(source).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    let root = RawNode::parse(value, "root")?;
    let mut builder = Builder {
        registry: &registry,
        deck: None,
        background: Vec::new(),
        foreground: Vec::new(),
        overlays: Vec::new(),
    };
    let deck_props = builder.root(root)?;

    let Builder {
        deck,
        background,
        mut foreground,
        overlays,
        ..
    } = builder;
    foreground.extend(overlays);

    Ok(Presentation {
        title: deck_props.title.unwrap_or_default(),
        theme: deck_props.theme,
        deck: deck.ok_or(EmptyDeckError)?,
        background,
        foreground,
        resources: ResourcePaths::default(),
        source: path.to_path_buf(),
    })
}

fn default_title(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "slidedeck".to_string())
}

struct Builder<'r> {
    registry: &'r Registry,
    /// Created by the first slide; later slides are appended.
    deck: Option<Deck>,
    background: Vec<WidgetNode>,
    foreground: Vec<WidgetNode>,
    overlays: Vec<WidgetNode>,
}

/// A node after its constructor ran; children are still raw.
struct Constructed {
    tag: String,
    built: Built,
    placement: Placement,
    children: Vec<RawNode>,
}

impl Builder<'_> {
    fn root(&mut self, raw: RawNode) -> Result<registry::DeckProps, LoadError> {
        let root = self.construct(raw, "root")?;
        let Built::Slides(props) = root.built else {
            return Err(LoadError::InvalidRoot { tag: root.tag });
        };

        for (i, raw) in root.children.into_iter().enumerate() {
            let path = format!("{}/{}[{i}]", root.tag, raw.tag);
            let node = self.construct(raw, &path)?;
            match node.built {
                Built::Slide(slide) => {
                    let content = self.widgets(node.children, &path)?;
                    let slide = Slide {
                        title: slide.title,
                        is_section: slide.is_section,
                        active: false,
                        background: slide.background,
                        content,
                    };
                    match &mut self.deck {
                        Some(deck) => deck.push(slide),
                        None => self.deck = Some(Deck::new(vec![slide])?),
                    }
                }
                Built::Background => {
                    let mut widgets = self.widgets(node.children, &path)?;
                    self.background.append(&mut widgets);
                }
                Built::Foreground => {
                    let mut widgets = self.widgets(node.children, &path)?;
                    self.foreground.append(&mut widgets);
                }
                Built::Widget(kind) => {
                    let children = self.widgets(node.children, &path)?;
                    self.overlays.push(
                        WidgetNode::new(kind)
                            .with_placement(node.placement)
                            .with_children(children),
                    );
                }
                Built::Slides(_) => {
                    return Err(LoadError::Misplaced {
                        node: path,
                        tag: node.tag,
                    });
                }
            }
        }
        Ok(props)
    }

    fn widgets(&self, children: Vec<RawNode>, path: &str) -> Result<Vec<WidgetNode>, LoadError> {
        children
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                let child_path = format!("{path}/{}[{i}]", raw.tag);
                self.widget(raw, &child_path)
            })
            .collect()
    }

    fn widget(&self, raw: RawNode, path: &str) -> Result<WidgetNode, LoadError> {
        let node = self.construct(raw, path)?;
        let Built::Widget(kind) = node.built else {
            return Err(LoadError::Misplaced {
                node: path.to_string(),
                tag: node.tag,
            });
        };
        let children = self.widgets(node.children, path)?;
        Ok(WidgetNode::new(kind)
            .with_placement(node.placement)
            .with_children(children))
    }

    /// Resolve templates, run the tag's constructor and check that every
    /// property was used.
    fn construct(&self, raw: RawNode, path: &str) -> Result<Constructed, LoadError> {
        let node = self.registry.expand(raw, path)?;
        let ctor = registry::builtin(&node.tag).ok_or_else(|| LoadError::UnknownWidget {
            node: path.to_string(),
            tag: node.tag.clone(),
        })?;
        let mut reader = PropReader::new(path, &node.tag, node.props);
        let built = ctor(&mut reader)?;
        let placement = match built {
            Built::Widget(_) => reader.placement()?,
            _ => Placement::default(),
        };
        // Ids only name nodes for the author.
        reader.take::<String>("id")?;
        reader.finish()?;
        Ok(Constructed {
            tag: node.tag.clone(),
            built,
            placement,
            children: node.children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{HAlign, WidgetKind};
    use eframe::egui::Color32;

    const DECK: &str = r##"
widget: Slides
title: Demo
theme: light
children:
  - widget: SlidesBackground
    children:
      - widget: Rectangle
        color: "#202020"
  - widget: Slide
    title: Intro
    is_section: true
    background: "#102030"
    children:
      - widget: Label
        id: headline
        text: Hello
        halign: center
        pos_hint: {x: 0.1, y: 0.2}
        size_hint: [0.8, 0.2]
  - widget: Slide
    title: Details
    children:
      - widget: FloatLayout
        children:
          - widget: Label
            text: nested
  - widget: SlidesForeground
    children:
      - widget: Label
        text: "{page} / {count}"
  - widget: Label
    text: overlay
"##;

    fn load_deck(source: &str) -> Result<Presentation, LoadError> {
        load_str(source, None, Path::new("."))
    }

    #[test]
    fn test_load_full_tree() {
        let p = load_deck(DECK).unwrap();
        assert_eq!(p.title, "Demo");
        assert_eq!(p.theme.as_deref(), Some("light"));
        assert_eq!(p.deck.max_index(), 2);

        let intro = p.deck.slide(0).unwrap();
        assert_eq!(intro.title, "Intro");
        assert!(intro.is_section);
        assert_eq!(intro.background, Some(Color32::from_rgb(0x10, 0x20, 0x30)));
        let label = &intro.content[0];
        assert_eq!(label.placement.size_hint, [0.8, 0.2]);
        match &label.kind {
            WidgetKind::Label(props) => {
                assert_eq!(props.text, "Hello");
                assert_eq!(props.halign, HAlign::Center);
            }
            other => panic!("unexpected {other:?}"),
        }

        let details = p.deck.slide(1).unwrap();
        assert!(!details.is_section);
        assert!(matches!(details.content[0].kind, WidgetKind::Group));
        assert_eq!(details.content[0].children.len(), 1);

        assert_eq!(p.background.len(), 1);
        assert!(matches!(
            &p.background[0].kind,
            WidgetKind::Rectangle(props) if props.color == Color32::from_rgb(0x20, 0x20, 0x20)
        ));
        // Foreground decorations first, then overlays.
        assert_eq!(p.foreground.len(), 2);
        assert!(matches!(
            &p.foreground[1].kind,
            WidgetKind::Label(props) if props.text == "overlay"
        ));
        assert_eq!(p.resources.dirs(), [PathBuf::from(".")]);
    }

    #[test]
    fn test_templates_expand_to_slides() {
        let templates = "TitleSlide:\n  base: Slide\n  is_section: true\n  children:\n    - widget: Label\n      text: from template\n";
        let source = "widget: Slides\nchildren:\n  - widget: TitleSlide\n    title: Part I\n  - widget: Slide\n";
        let p = load_str(source, Some(templates), Path::new(".")).unwrap();
        assert_eq!(p.deck.max_index(), 2);
        let first = p.deck.slide(0).unwrap();
        assert_eq!(first.title, "Part I");
        assert!(first.is_section);
        assert_eq!(first.content.len(), 1);
    }

    #[test]
    fn test_unknown_widget_reports_path() {
        let err = load_deck(
            "widget: Slides\nchildren:\n  - widget: Slide\n    children:\n      - widget: Button\n",
        )
        .unwrap_err();
        match err {
            LoadError::UnknownWidget { node, tag } => {
                assert_eq!(tag, "Button");
                assert_eq!(node, "Slides/Slide[0]/Button[0]");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_property() {
        let err = load_deck("widget: Slides\nchildren:\n  - widget: Slide\n    colour: red\n")
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnknownProperty { ref key, ref tag, .. } if key == "colour" && tag == "Slide"
        ));
        assert!(err.to_string().contains("Slides/Slide[0]"));
    }

    #[test]
    fn test_slide_rejects_placement() {
        let err = load_deck(
            "widget: Slides\nchildren:\n  - widget: Slide\n    size_hint: [0.5, 0.5]\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::UnknownProperty { .. }));
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        assert!(matches!(
            load_deck("widget: Slides\n"),
            Err(LoadError::EmptyDeck(_))
        ));
        assert!(matches!(
            load_deck("widget: Slides\nchildren:\n  - widget: SlidesForeground\n"),
            Err(LoadError::EmptyDeck(_))
        ));
    }

    #[test]
    fn test_structure_errors() {
        assert!(matches!(
            load_deck("widget: Slide\n"),
            Err(LoadError::InvalidRoot { tag }) if tag == "Slide"
        ));
        assert!(matches!(
            load_deck("title: no tag\n"),
            Err(LoadError::MissingTag { .. })
        ));
        assert!(matches!(
            load_deck("widget: Slides\nchildren:\n  - widget: Slide\n    children:\n      - widget: Slide\n"),
            Err(LoadError::Misplaced { tag, .. }) if tag == "Slide"
        ));
        assert!(matches!(
            load_deck("widget: Slides\nchildren:\n  - widget: Slides\n"),
            Err(LoadError::Misplaced { .. })
        ));
        assert!(matches!(
            load_deck("widget: Slides\nchildren: nope\n"),
            Err(LoadError::InvalidProperty { key, .. }) if key == "children"
        ));
        assert!(matches!(
            load_deck("widget: [unclosed\n"),
            Err(LoadError::Yaml { .. })
        ));
    }

    #[test]
    fn test_load_directory_with_templates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PRESENTATION_FILE),
            "widget: Slides\nchildren:\n  - widget: Big\n",
        )
        .unwrap();
        std::fs::write(dir.path().join(TEMPLATES_FILE), "Big:\n  base: Slide\n  title: Big\n")
            .unwrap();

        let p = load(dir.path()).unwrap();
        assert_eq!(p.deck.current().title, "Big");
        assert_eq!(p.resources.dirs(), [dir.path().to_path_buf()]);
        assert!(!p.title.is_empty());
    }

    #[test]
    fn test_load_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("talk.kv");
        std::fs::write(&file, "widget: Slides\ntitle: Talk\nchildren:\n  - widget: Slide\n").unwrap();

        let files = resolve_input(&file);
        assert_eq!(files.presentation, file);
        assert_eq!(files.base_dir, dir.path());
        assert_eq!(files.templates, None);

        let p = load(&file).unwrap();
        assert_eq!(p.title, "Talk");
        assert_eq!(p.source, file);
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let files = resolve_input(Path::new("deck.kv"));
        assert_eq!(files.base_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(dir.path()), Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_bad_theme() {
        let err = load_deck("widget: Slides\ntheme: neon\nchildren:\n  - widget: Slide\n")
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidProperty { key, .. } if key == "theme"));
    }

    #[test]
    fn test_bundled_demo_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/intro");
        let p = load(&dir).unwrap();
        assert_eq!(p.title, "Introducing slidedeck");
        assert_eq!(p.deck.max_index(), 4);
        let sections: Vec<_> = p.deck.slides().iter().filter(|s| s.is_section).collect();
        assert_eq!(sections.len(), 2);
        assert_eq!(p.foreground.len(), 1);
    }
}
