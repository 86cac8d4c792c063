//! Which catalog layers are switched on.

use std::collections::BTreeSet;

use access_map_layers_models::LayerDef;

use crate::registry::all_layers;

/// Visibility toggles over a fixed set of layers. Every layer starts
/// visible.
#[derive(Debug, Clone)]
pub struct LayerVisibility {
    layers: Vec<LayerDef>,
    hidden: BTreeSet<String>,
}

impl LayerVisibility {
    /// Tracks `layers`, all visible.
    #[must_use]
    pub const fn new(layers: Vec<LayerDef>) -> Self {
        Self {
            layers,
            hidden: BTreeSet::new(),
        }
    }

    /// Tracked layers in catalog order.
    #[must_use]
    pub fn layers(&self) -> &[LayerDef] {
        &self.layers
    }

    /// Flips layer `id` and returns its new visibility, or `None` if the
    /// layer is unknown.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        if !self.layers.iter().any(|layer| layer.id == id) {
            log::warn!("Ignoring toggle for unknown layer '{id}'");
            return None;
        }

        let visible = self.hidden.remove(id);
        if !visible {
            self.hidden.insert(id.to_string());
        }
        log::debug!("Layer '{id}' visible={visible}");
        Some(visible)
    }

    /// Whether layer `id` is known and visible.
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id == id) && !self.hidden.contains(id)
    }

    /// Ids of the visible layers, in catalog order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|layer| !self.hidden.contains(&layer.id))
            .map(|layer| layer.id.as_str())
            .collect()
    }

    /// Visible point layers, in catalog order. These are the layers the
    /// accessibility query searches.
    #[must_use]
    pub fn visible_point_layers(&self) -> Vec<&LayerDef> {
        self.layers
            .iter()
            .filter(|layer| layer.is_point() && !self.hidden.contains(&layer.id))
            .collect()
    }
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self::new(all_layers())
    }
}
