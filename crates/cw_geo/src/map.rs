use serde::Serialize;
use std::collections::HashMap;

use cw_core::ClassifiedArticle;

use crate::coords::Geocoder;
use crate::severity::threat_severity;

/// One scored threat inside a region aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct RegionThreat {
    pub title: String,
    pub threat_type: String,
    pub severity: u8,
    pub source: String,
    pub url: String,
}

/// Everything a rendering collaborator needs to draw one region marker.
#[derive(Debug, Clone, Serialize)]
pub struct RegionThreatAggregate {
    pub region: String,
    pub coordinates: (f64, f64),
    /// Sorted by severity, highest first.
    pub threats: Vec<RegionThreat>,
    pub max_severity: u8,
    pub count: usize,
    pub marker_radius: u32,
    pub color: &'static str,
}

/// Marker radius scales with the region's worst severity.
pub fn marker_radius(max_severity: u8) -> u32 {
    10 + 2 * max_severity as u32
}

pub fn severity_color(severity: u8) -> &'static str {
    match severity {
        2 => "blue",
        3 => "orange",
        4 => "red",
        5 => "darkred",
        _ => "lightgray",
    }
}

/// Group a classified batch by region, score each threat, and resolve region
/// coordinates. Regions appear in first-encounter order; recomputed on every
/// call, nothing persisted beyond the geocoder's coordinate cache.
pub async fn build_map_model(
    geocoder: &Geocoder,
    articles: &[ClassifiedArticle],
) -> Vec<RegionThreatAggregate> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<RegionThreat>> = HashMap::new();

    for article in articles {
        let severity = threat_severity(&article.threat_type, Some(&article.category));
        let threats = grouped.entry(article.region.clone()).or_insert_with(|| {
            order.push(article.region.clone());
            Vec::new()
        });
        threats.push(RegionThreat {
            title: article.title.clone(),
            threat_type: article.threat_type.clone(),
            severity,
            source: article.source.clone(),
            url: article.url.clone(),
        });
    }

    let mut aggregates = Vec::with_capacity(order.len());
    for region in order {
        let mut threats = grouped.remove(&region).unwrap_or_default();
        threats.sort_by(|a, b| b.severity.cmp(&a.severity));

        let max_severity = threats.iter().map(|t| t.severity).max().unwrap_or(1);
        let count = threats.len();
        let coordinates = geocoder.resolve(&region).await;

        aggregates.push(RegionThreatAggregate {
            region,
            coordinates,
            threats,
            max_severity,
            count,
            marker_radius: marker_radius(max_severity),
            color: severity_color(max_severity),
        });
    }

    aggregates
}
