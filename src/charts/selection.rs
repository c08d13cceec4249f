//! Chart selection: the thirteen menu entries.

/// One entry of the chart menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    CorrelationMatrix,
    RoomTypePricePie,
    AveragePriceByGroup,
    RoomTypeCounts,
    GroupCounts,
    GroupDensity,
    GroupPriceByRoomType,
    PriceViolinByRoomType,
    PriceScatterByGroup,
    PriceByCoordinates,
    PriceTrendByRoomType,
    PriceHistogram,
    PriceDensity,
}

impl ChartKind {
    /// Menu order.
    pub const ALL: [ChartKind; 13] = [
        ChartKind::CorrelationMatrix,
        ChartKind::RoomTypePricePie,
        ChartKind::AveragePriceByGroup,
        ChartKind::RoomTypeCounts,
        ChartKind::GroupCounts,
        ChartKind::GroupDensity,
        ChartKind::GroupPriceByRoomType,
        ChartKind::PriceViolinByRoomType,
        ChartKind::PriceScatterByGroup,
        ChartKind::PriceByCoordinates,
        ChartKind::PriceTrendByRoomType,
        ChartKind::PriceHistogram,
        ChartKind::PriceDensity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::CorrelationMatrix => "Correlation Matrix",
            ChartKind::RoomTypePricePie => "Pie Chart- Room Type-Price",
            ChartKind::AveragePriceByGroup => "Bar Plot- Average prices by neighbourhood",
            ChartKind::RoomTypeCounts => "Bar Plot Horizontal- Amount of Room Types",
            ChartKind::GroupCounts => "Bar Plot- Amount of Neighbourhood Groups",
            ChartKind::GroupDensity => "Bar Plot- Neighbourhood Density",
            ChartKind::GroupPriceByRoomType => "Bar Plot- N-GROUP - PRICE - ROOM-TYPE",
            ChartKind::PriceViolinByRoomType => "Violin-Plot Distribution of Prices by Room Type",
            ChartKind::PriceScatterByGroup => {
                "Scatter Plot- Price Distribution by Neighborhood Group"
            }
            ChartKind::PriceByCoordinates => "Scatter Plot- Prices by coordinates",
            ChartKind::PriceTrendByRoomType => {
                "Line Plot- Change of prices over the years according to room type"
            }
            ChartKind::PriceHistogram => "Hist Plot- Price Count",
            ChartKind::PriceDensity => "Kde Plot- Price Density",
        }
    }

    /// Exact match against the menu labels.
    pub fn from_label(label: &str) -> Option<ChartKind> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// File name stem for exported images.
    pub fn file_stem(self) -> String {
        let mut stem = String::new();
        for c in self.label().chars() {
            if c.is_ascii_alphanumeric() {
                stem.push(c.to_ascii_lowercase());
            } else if !stem.ends_with('_') && !stem.is_empty() {
                stem.push('_');
            }
        }
        stem.trim_end_matches('_').to_string()
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_round_trip() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_label(kind.label()), Some(kind));
        }
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels: HashSet<&str> = ChartKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels.len(), 13);
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(ChartKind::from_label("Radar Chart"), None);
        assert_eq!(ChartKind::from_label("correlation matrix"), None);
        assert_eq!(ChartKind::from_label(""), None);
    }

    #[test]
    fn test_menu_starts_with_correlation_matrix() {
        assert_eq!(ChartKind::ALL[0], ChartKind::default());
        assert_eq!(ChartKind::ALL[12].label(), "Kde Plot- Price Density");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(ChartKind::CorrelationMatrix.file_stem(), "correlation_matrix");
        assert_eq!(
            ChartKind::GroupPriceByRoomType.file_stem(),
            "bar_plot_n_group_price_room_type"
        );
    }
}
