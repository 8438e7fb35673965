use crate::{encoder::FadePolicy, field::FieldVisualizationMode};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FieldParams {
    pub mode: FieldVisualizationMode,
    pub fade: FadePolicy,
}
