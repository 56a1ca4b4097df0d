// Imports
use geo::Geometry;
use std::collections::BTreeMap;

/// A map feature: an identity, a set of attributes and a geometry in the map's working CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// The feature id, unique within its layer.
    pub id: String,
    /// The feature attributes.
    pub attributes: BTreeMap<String, String>,
    /// The feature geometry.
    pub geometry: Geometry<f64>,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: Geometry<f64>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
            geometry,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }

    /// A human readable title: the configured title attribute if present, then the
    /// `namn` attribute, then the feature id.
    pub fn display_title(&self, title_attribute: Option<&str>) -> &str {
        title_attribute
            .and_then(|attr| self.attribute(attr))
            .or_else(|| self.attribute("namn"))
            .unwrap_or(&self.id)
    }
}

/// The selection group an item belongs to.
///
/// For a feature extracted out of a group layer this is the group, otherwise the layer itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroup {
    pub name: String,
    pub title: String,
}

/// A feature together with the layer (and group, if any) it was extracted from.
///
/// Items are created fresh per query by the extraction pipeline and are not retained
/// after the query completes, except inside the selection set.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedItem {
    pub feature: Feature,
    pub layer_name: String,
    pub layer_title: String,
    pub group: Option<SelectionGroup>,
}

impl SelectedItem {
    pub fn new(
        feature: Feature,
        layer_name: impl Into<String>,
        layer_title: impl Into<String>,
        group: Option<SelectionGroup>,
    ) -> Self {
        Self {
            feature,
            layer_name: layer_name.into(),
            layer_title: layer_title.into(),
            group,
        }
    }

    /// The identity the selection set keys items by.
    pub fn identity(&self) -> (&str, &str) {
        (self.layer_name.as_str(), self.feature.id.as_str())
    }

    /// The selection group of the item, falling back to the owning layer.
    pub fn selection_group(&self) -> (&str, &str) {
        match &self.group {
            Some(group) => (group.name.as_str(), group.title.as_str()),
            None => (self.layer_name.as_str(), self.layer_title.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn display_title_fallback_order() {
        let feature = Feature::new("f-1", Geometry::Point(Point::new(0.0, 0.0)))
            .with_attribute("namn", "Storgatan")
            .with_attribute("beteckning", "1:12");

        assert_eq!(feature.display_title(Some("beteckning")), "1:12");
        assert_eq!(feature.display_title(Some("missing")), "Storgatan");
        assert_eq!(feature.display_title(None), "Storgatan");

        let bare = Feature::new("f-2", Geometry::Point(Point::new(0.0, 0.0)));
        assert_eq!(bare.display_title(None), "f-2");
    }

    #[test]
    fn selection_group_falls_back_to_layer() {
        let feature = Feature::new("f-1", Geometry::Point(Point::new(0.0, 0.0)));

        let grouped = SelectedItem::new(
            feature.clone(),
            "roads",
            "Roads",
            Some(SelectionGroup {
                name: "transport".to_string(),
                title: "Transport".to_string(),
            }),
        );
        let ungrouped = SelectedItem::new(feature, "roads", "Roads", None);

        assert_eq!(grouped.selection_group(), ("transport", "Transport"));
        assert_eq!(ungrouped.selection_group(), ("roads", "Roads"));
    }
}
