/// Defaults used when a [`WrapperSpec`](crate::WrapperSpec) names neither a
/// tag nor a class.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct HighlightConfig {
    pub tag_name: String,
    pub class_name: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            tag_name: "mark".to_string(),
            class_name: "highlight".to_string(),
        }
    }
}
