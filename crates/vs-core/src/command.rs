//! Command templates and intent encoding
//!
//! Every device command is one of a small set of fixed templates. Templates
//! contain `{}` placeholders that are filled, in order, with the parameters
//! carried by an [`Intent`].

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Placeholder marker used inside command templates
pub const PLACEHOLDER: &str = "{}";

/// The fixed set of commands understood by the devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Point a decoder at an encoder's stream
    SwitchHost,
    /// Configure a decoder's position inside a video wall
    VideoWall,
    /// Ask a decoder which encoder it is streaming from
    GetHost,
    /// Read model, firmware and network details
    GetInfo,
    /// Read the current video timing
    GetSignal,
}

impl CommandKind {
    /// The protocol template for this command
    pub const fn template(self) -> &'static str {
        match self {
            CommandKind::SwitchHost => {
                "CMD=START&UNIT.ID=ALL&STREAM.HOST={}&VW.ACTIVE=FALSE&STREAM.CONNECT=TRUE&CMD=END"
            }
            CommandKind::VideoWall => {
                "CMD=START&UNIT.ID=ALL&VW.MAX_ROWS={}&VW.MAX_COLUMNS={}&VW.ROW={}&VW.COLUMN={}&VW.ACTIVE=TRUE&CMD=END"
            }
            CommandKind::GetHost => "CMD=START&UNIT.ID=ALL&QUERY.KEY=STREAM.HOST&CMD=END",
            CommandKind::GetInfo => {
                "CMD=START&UNIT.ID=ALL&QUERY.KEY=UNIT.MODEL&QUERY.KEY=UNIT.FIRMWARE&QUERY.KEY=UNIT.FIRMWARE_DATE&QUERY.KEY=IP.ADDRESS&QUERY.KEY=UNIT.MAC_ADDRESS&CMD=END"
            }
            CommandKind::GetSignal => "CMD=START&UNIT.ID=ALL&QUERY.VIDEO_TIMING=TRUE&CMD=END",
        }
    }

    /// Number of parameters the template expects
    pub fn placeholder_count(self) -> usize {
        self.template().matches(PLACEHOLDER).count()
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::SwitchHost => write!(f, "switch_host"),
            CommandKind::VideoWall => write!(f, "video_wall"),
            CommandKind::GetHost => write!(f, "get_host"),
            CommandKind::GetInfo => write!(f, "get_info"),
            CommandKind::GetSignal => write!(f, "get_signal"),
        }
    }
}

/// Position of a decoder inside a video wall grid
///
/// Field names follow the JSON bodies sent by control panels
/// (`totalRows`, `totalColumns`, `rowPosition`, `columnPosition`).
/// Values are not range-checked; the device rejects invalid layouts itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoWallLayout {
    pub total_rows: u32,
    pub total_columns: u32,
    pub row_position: u32,
    pub column_position: u32,
}

/// A structured request for a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Switch a decoder to the stream of `encoder`
    SwitchHost { encoder: IpAddr },
    /// Place a decoder in a video wall
    ConfigureVideoWall(VideoWallLayout),
    /// Query the stream host of a decoder
    QueryConnectedHost,
    /// Query hardware details
    QueryDeviceInfo,
    /// Query whether a signal is present
    QuerySignal,
}

impl Intent {
    pub fn kind(&self) -> CommandKind {
        match self {
            Intent::SwitchHost { .. } => CommandKind::SwitchHost,
            Intent::ConfigureVideoWall(_) => CommandKind::VideoWall,
            Intent::QueryConnectedHost => CommandKind::GetHost,
            Intent::QueryDeviceInfo => CommandKind::GetInfo,
            Intent::QuerySignal => CommandKind::GetSignal,
        }
    }

    /// Template parameters in substitution order
    fn params(&self) -> Vec<String> {
        match self {
            Intent::SwitchHost { encoder } => vec![encoder.to_string()],
            Intent::ConfigureVideoWall(layout) => vec![
                layout.total_rows.to_string(),
                layout.total_columns.to_string(),
                layout.row_position.to_string(),
                layout.column_position.to_string(),
            ],
            Intent::QueryConnectedHost | Intent::QueryDeviceInfo | Intent::QuerySignal => {
                Vec::new()
            }
        }
    }

    /// Encode this intent into the device command string
    pub fn encode(&self) -> String {
        fill_template(self.kind().template(), &self.params())
    }
}

/// Substitute `params` into the `{}` placeholders of `template`, in order.
///
/// # Panics
///
/// Panics when the number of placeholders differs from `params.len()`.
/// Templates are static and intents are built internally, so a mismatch is
/// a defect in the caller rather than a runtime condition.
pub fn fill_template(template: &str, params: &[String]) -> String {
    let segments: Vec<&str> = template.split(PLACEHOLDER).collect();
    let placeholders = segments.len() - 1;
    assert_eq!(
        placeholders,
        params.len(),
        "command template expects {} parameter(s), got {}",
        placeholders,
        params.len()
    );

    let mut out = String::with_capacity(template.len() + params.iter().map(String::len).sum::<usize>());
    out.push_str(segments[0]);
    for (param, segment) in params.iter().zip(&segments[1..]) {
        out.push_str(param);
        out.push_str(segment);
    }
    out
}
