//! Shared types for release records.
//!
//! These types match the JSON format served by the release backend's
//! `/api/releases` and `/api/helmreleases` endpoints. They serve as the
//! common data format between the backend producer and this dashboard
//! consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity classification of a record's urgency.
///
/// The wire format uses lowercase strings ("none", "ok", "warning",
/// "critical", "error"). Backends have been observed emitting values
/// outside this set (for example "white"); those deserialize as
/// [`Severity::Unknown`] so that a single unexpected value never fails
/// a whole payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Ok,
    Warning,
    Critical,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Severities that participate in the aggregate classification,
    /// ordered least to most severe. `Error` and `Unknown` are
    /// display-only and never drive the aggregate.
    pub const AGGREGATE_ORDER: [Severity; 4] =
        [Severity::None, Severity::Ok, Severity::Warning, Severity::Critical];

    /// Position of this severity in [`Self::AGGREGATE_ORDER`], or `None`
    /// for display-only severities.
    pub fn aggregate_rank(self) -> Option<usize> {
        Self::AGGREGATE_ORDER.iter().position(|&s| s == self)
    }

    /// Returns the display label for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Unknown => "unknown",
        }
    }
}

/// The kind of release a record describes.
///
/// The wire format uses human-readable strings ("Latest release",
/// "Helm chart", "Pre-release", "Draft", "Tag"). Only the first two
/// drive display behavior; everything else maps to [`ReleaseKind::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseKind {
    #[serde(rename = "Latest release")]
    LatestRelease,
    #[serde(rename = "Helm chart")]
    HelmChart,
    #[default]
    #[serde(other)]
    Other,
}

impl ReleaseKind {
    /// Returns the display label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            ReleaseKind::LatestRelease => "Latest release",
            ReleaseKind::HelmChart => "Helm chart",
            ReleaseKind::Other => "Other",
        }
    }
}

/// One release/event entry as returned by an endpoint.
///
/// Records are immutable snapshots received from the backend; the
/// dashboard never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Identifier of the tracked repository (e.g. "grafana/loki").
    #[serde(default)]
    pub repository_name: String,

    /// Human-readable release name, when the backend provides one.
    #[serde(default)]
    pub name: String,

    /// Version label for the release (e.g. "v2.9.1" or "chart: 5.2.0").
    #[serde(default)]
    pub tag_name: String,

    /// Application version shipped by a chart release. The backend sends
    /// an empty string when not applicable.
    #[serde(default)]
    pub app_version: Option<String>,

    /// What kind of release this record describes.
    #[serde(rename = "type", default)]
    pub kind: ReleaseKind,

    /// Severity classification computed by the backend.
    #[serde(default)]
    pub severity: Severity,

    /// Days elapsed since the release was published.
    #[serde(default)]
    pub days: u32,

    /// When the release was published.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    /// Link to the release page, opened on card activation.
    #[serde(rename = "html_url", default)]
    pub link_url: Option<String>,
}

impl Record {
    /// True when this record describes the latest release of a repository.
    /// Drives emphasis styling on the tag label.
    pub fn is_latest(&self) -> bool {
        self.kind == ReleaseKind::LatestRelease
    }

    /// True when this record describes a Helm chart release.
    /// Drives the chart badge next to the record.
    pub fn is_helm_chart(&self) -> bool {
        self.kind == ReleaseKind::HelmChart
    }

    /// The app version, treating the backend's empty string as absent.
    pub fn app_version(&self) -> Option<&str> {
        self.app_version.as_deref().filter(|v| !v.is_empty())
    }
}
