// Domain models - Typed values, track records and the metadata tree

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::fields::track_record;
use crate::domain::rules::Correction;

/// Descriptive metadata the engine can attach to any field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    /// Measurement unit (e.g. " ms", " b/s")
    pub measure: String,
    /// Human readable field label
    pub name_text: String,
    /// Free-form description of the field
    pub info: String,
}

impl Extra {
    /// True when the engine supplied none of the descriptive values
    pub fn is_empty(&self) -> bool {
        self.measure.is_empty() && self.name_text.is_empty() && self.info.is_empty()
    }
}

/// A decoded field value paired with its descriptive metadata.
///
/// Absent fields are represented by the zero value of `T`, never by a
/// missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Value<T> {
    pub val: T,
    pub extra: Extra,
}

impl<T> Value<T> {
    /// Wrap a value with empty extra metadata
    pub fn new(val: T) -> Self {
        Self {
            val,
            extra: Extra::default(),
        }
    }

    /// Replace the extra metadata
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }
}

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.val, self.extra.measure)
    }
}

/// Timestamps carry the offset they were decoded with
pub type Timestamp = DateTime<FixedOffset>;

/// Engine integers are 64-bit; sizes and counts share the same width
pub type IntValue = Value<i64>;
pub type Int64Value = IntValue;
pub type Float64Value = Value<f64>;
pub type StringValue = Value<String>;
pub type BoolValue = Value<bool>;
pub type TimeValue = Value<Timestamp>;

impl TimeValue {
    /// True for the zero timestamp used when a date was absent or unparsable
    pub fn is_zero(&self) -> bool {
        self.val == Timestamp::default()
    }
}

/// Top-level stream category reported by the inspection engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    General,
    Video,
    Audio,
    Text,
    Other,
    Image,
    Menu,
}

impl StreamKind {
    /// All kinds, in the engine's numbering order
    pub const ALL: [StreamKind; 7] = [
        StreamKind::General,
        StreamKind::Video,
        StreamKind::Audio,
        StreamKind::Text,
        StreamKind::Other,
        StreamKind::Image,
        StreamKind::Menu,
    ];

    /// Engine name of the kind, as used in the `@type` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::General => "General",
            StreamKind::Video => "Video",
            StreamKind::Audio => "Audio",
            StreamKind::Text => "Text",
            StreamKind::Other => "Other",
            StreamKind::Image => "Image",
            StreamKind::Menu => "Menu",
        }
    }

    /// Parse an engine kind name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

track_record! {
    /// Container-level attributes
    pub struct GeneralInfo(General) {
        video_track_count: Int = "VideoCount",
        audio_track_count: Int = "AudioCount",
        text_track_count: Int = "TextCount",
        file_extension: Str = "FileExtension",
        format: Str = "Format",
        format_profile: Str = "Format_Profile",
        codec_id: Str = "CodecID",
        codec_id_compatible: Str = "CodecID_Compatible",
        file_size: Int64 = "FileSize",
        /// Duration in seconds
        duration: Float = "Duration",
        bitrate_mode: Str = "OverallBitRate_Mode",
        bitrate: Int = "OverallBitRate",
        frame_rate: Float = "FrameRate",
        frame_count: Int = "FrameCount",
        stream_size: Int64 = "StreamSize",
        header_size: Int64 = "HeaderSize",
        data_size: Int64 = "DataSize",
        footer_size: Int64 = "FooterSize",
        is_streamable: Bool = "IsStreamable",
        encoded_date: Time = "Encoded_Date",
        tagged_date: Time = "Tagged_Date",
        file_modified_date: Time = "File_Modified_Date",
        /// Wall-clock modification time in the host's zone
        file_modified_date_local: LocalTime = "File_Modified_Date_Local",
        encoded_application: Str = "Encoded_Application",
    }
}

track_record! {
    /// Per-stream attributes of one video track
    pub struct VideoTrack(Video) {
        /// Position of the stream inside the container
        stream_order: Int = "StreamOrder",
        id: Int = "ID",
        format: Str = "Format",
        profile: Str = "Format_Profile",
        format_level: Str = "Format_Level",
        is_cabac_enabled: Bool = "Format_Settings_CABAC",
        ref_frames: Int = "Format_Settings_RefFrames",
        gop: Str = "Format_Settings_GOP",
        codec_id: Str = "CodecID",
        duration: Float = "Duration",
        bitrate_mode: Str = "BitRate_Mode",
        bitrate: Int = "BitRate",
        width: Int = "Width",
        height: Int = "Height",
        height_offset: Int = "Height_Offset",
        stored_height: Int = "Stored_Height",
        sampled_width: Int = "Sampled_Width",
        sampled_height: Int = "Sampled_Height",
        pixel_aspect_ratio: Float = "PixelAspectRatio",
        display_aspect_ratio: Float = "DisplayAspectRatio",
        rotation: Float = "Rotation",
        frame_rate_mode: Str = "FrameRate_Mode",
        frame_rate_mode_original: Str = "FrameRate_Mode_Original",
        frame_rate: Float = "FrameRate",
        frame_count: Int = "FrameCount",
        color_space: Str = "ColorSpace",
        chroma_subsampling: Str = "ChromaSubsampling",
        /// Engine value, or the ProRes profile's fixed depth
        bit_depth: Int = "BitDepth" => Correction::ProResBitDepth,
        scan_type: Str = "ScanType",
        stream_size: Int64 = "StreamSize",
        encoded_date: Time = "Encoded_Date",
        tagged_date: Time = "Tagged_Date",
        first_frame_timecode: Str = "TimeCode_FirstFrame",
        delay: Float = "Delay",
    }
}

track_record! {
    /// Per-stream attributes of one audio track
    pub struct AudioTrack(Audio) {
        stream_order: Int = "StreamOrder",
        id: Int = "ID",
        format: Str = "Format",
        format_additional_features: Str = "Format_AdditionalFeatures",
        codec_id: Str = "CodecID",
        duration: Float = "Duration",
        bitrate_mode: Str = "BitRate_Mode",
        bitrate: Int = "BitRate",
        bitrate_maximum: Int = "BitRate_Maximum",
        channels: Int = "Channels",
        channel_positions: Str = "ChannelPositions",
        channel_layout: Str = "ChannelLayout",
        samples_per_frame: Int = "SamplesPerFrame",
        sampling_rate: Int = "SamplingRate",
        sampling_count: Int64 = "SamplingCount",
        frame_rate: Float = "FrameRate",
        frame_count: Int = "FrameCount",
        compression_mode: Str = "Compression_Mode",
        stream_size: Int64 = "StreamSize",
        stream_size_proportion: Float = "StreamSize_Proportion",
        is_default: Bool = "Default",
        alternate_group: Str = "AlternateGroup",
        delay: Float = "Delay",
        encoded_date: Time = "Encoded_Date",
        tagged_date: Time = "Tagged_Date",
    }
}

track_record! {
    /// Timecode track, reported by the engine as an "Other" stream
    pub struct TimecodeTrack(Other) {
        stream_order: Int = "StreamOrder",
        id: Str = "ID",
        format: Str = "Format",
        first_frame_timecode: Str = "TimeCode_FirstFrame",
        settings: Str = "TimeCode_Settings",
        frame_rate: Float = "FrameRate",
        delay: Float = "Delay",
    }
}

/// Root of the inspection result. Built once per inspection and owned by the
/// caller; tracks keep the order the engine reported them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataTree {
    /// Display name derived from the locator
    pub file: String,
    /// Locator the tree was produced from
    pub locator: String,
    pub general: GeneralInfo,
    pub video_tracks: Vec<VideoTrack>,
    pub audio_tracks: Vec<AudioTrack>,
    pub timecode_tracks: Vec<TimecodeTrack>,
}

impl MetadataTree {
    /// Number of modeled tracks (general info excluded)
    pub fn total_tracks(&self) -> usize {
        self.video_tracks.len() + self.audio_tracks.len() + self.timecode_tracks.len()
    }

    /// First video track, if any
    pub fn primary_video_track(&self) -> Option<&VideoTrack> {
        self.video_tracks.first()
    }

    /// First audio track, if any
    pub fn primary_audio_track(&self) -> Option<&AudioTrack> {
        self.audio_tracks.first()
    }
}

#[cfg(test)]
mod tests;
