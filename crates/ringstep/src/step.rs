use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct StepTitle(String);

/// Icon name (looked up in the icon theme) or a path to an image file.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconRef(String);

crate::macros::impl_string_newtype!(StepTitle, IconRef);

impl IconRef {
    pub fn as_path(&self) -> Option<&Path> {
        let path = Path::new(self.0.as_str());
        path.is_absolute().then_some(path)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StepConfig {
    pub title: StepTitle,
    #[serde(default)]
    pub description: String,
    pub icon: Option<IconRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub index: usize,
    pub title: StepTitle,
    pub description: String,
    pub icon: Option<IconRef>,
}

/// The fixed, ordered content of a stepper. Built once at mount.
#[derive(Debug, Clone, PartialEq, Default, Deref)]
pub struct Steps(Vec<Step>);

impl Steps {
    pub fn from_config(configs: &[StepConfig]) -> Self {
        Self(
            configs
                .iter()
                .enumerate()
                .map(|(index, cfg)| Step {
                    index,
                    title: cfg.title.clone(),
                    description: cfg.description.clone(),
                    icon: cfg.icon.clone(),
                })
                .collect(),
        )
    }
}
