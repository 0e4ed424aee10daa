//! Track assembly: walks an opened field source and builds the metadata tree

use tracing::{debug, trace};

use crate::domain::fields::{SECONDARY_TYPE, TIMECODE_TYPE};
use crate::domain::model::{
    AudioTrack, GeneralInfo, MetadataTree, StreamKind, TimecodeTrack, VideoTrack,
};
use crate::ports::FieldSource;
use crate::utils::path::display_name;

pub mod mapper;

pub use mapper::{FieldDiagnostic, TrackMapper};

/// Assembly options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Look up unit, label and description for every field
    pub with_extra: bool,
}

/// A finished tree and the diagnostics collected while building it
#[derive(Debug, Clone)]
pub struct Assembly {
    pub tree: MetadataTree,
    pub diagnostics: Vec<FieldDiagnostic>,
}

/// Build the metadata tree for `locator` from an opened source.
///
/// General info is read from its single implicit instance. Video and audio
/// tracks are read in source order. Auxiliary tracks are kept only when their
/// secondary type marks them as timecode; any other auxiliary kind is skipped.
pub fn assemble(source: &dyn FieldSource, locator: &str, options: AssembleOptions) -> Assembly {
    let mut mapper = TrackMapper::new(source, options);

    let general: GeneralInfo = mapper.map_track(0);

    let video_tracks: Vec<VideoTrack> = (0..source.track_count(StreamKind::Video))
        .map(|index| mapper.map_track(index))
        .collect();

    let audio_tracks: Vec<AudioTrack> = (0..source.track_count(StreamKind::Audio))
        .map(|index| mapper.map_track(index))
        .collect();

    let mut timecode_tracks: Vec<TimecodeTrack> = Vec::new();
    for index in 0..source.track_count(StreamKind::Other) {
        let secondary = source.field_value(StreamKind::Other, index, SECONDARY_TYPE);
        if secondary == TIMECODE_TYPE {
            timecode_tracks.push(mapper.map_track(index));
        } else {
            trace!("Skipping auxiliary track {} of type {:?}", index, secondary);
        }
    }

    check_reported_count(StreamKind::Video, general.video_track_count.val, video_tracks.len());
    check_reported_count(StreamKind::Audio, general.audio_track_count.val, audio_tracks.len());

    let diagnostics = mapper.into_diagnostics();
    debug!(
        "Assembled {}: {} video, {} audio, {} timecode tracks, {} field diagnostics",
        locator,
        video_tracks.len(),
        audio_tracks.len(),
        timecode_tracks.len(),
        diagnostics.len()
    );

    Assembly {
        tree: MetadataTree {
            file: display_name(locator),
            locator: locator.to_string(),
            general,
            video_tracks,
            audio_tracks,
            timecode_tracks,
        },
        diagnostics,
    }
}

fn check_reported_count(kind: StreamKind, reported: i64, walked: usize) {
    if usize::try_from(reported).map_or(true, |reported| reported != walked) {
        debug!(
            "General info reports {} {} tracks, source yielded {}",
            reported, kind, walked
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::probe_memory::MemorySource;

    #[test]
    fn test_empty_source_yields_zeroed_tree() {
        let source = MemorySource::new();
        let assembly = assemble(&source, "/tmp/empty.mp4", AssembleOptions::default());

        assert_eq!(assembly.tree.file, "empty.mp4");
        assert_eq!(assembly.tree.locator, "/tmp/empty.mp4");
        assert_eq!(assembly.tree.general.file_size.val, 0);
        assert_eq!(assembly.tree.total_tracks(), 0);
        assert!(assembly.diagnostics.is_empty());
    }

    #[test]
    fn test_video_order_follows_source() {
        let mut source = MemorySource::new().with_track(StreamKind::General, &[("VideoCount", "3")]);
        for id in ["7", "3", "5"] {
            source.push_track(StreamKind::Video, &[("ID", id)]);
        }

        let assembly = assemble(&source, "multi.mkv", AssembleOptions::default());
        let ids: Vec<i64> = assembly.tree.video_tracks.iter().map(|v| v.id.val).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn test_only_timecode_auxiliary_tracks_are_kept() {
        let source = MemorySource::new()
            .with_track(StreamKind::Other, &[("Type", "Time code"), ("ID", "2"), ("TimeCode_FirstFrame", "01:00:00:00")])
            .with_track(StreamKind::Other, &[("Type", "Closed captions"), ("ID", "3")])
            .with_track(StreamKind::Other, &[("Type", "Time code"), ("ID", "4")]);

        let assembly = assemble(&source, "tc.mov", AssembleOptions::default());
        let ids: Vec<&str> = assembly
            .tree
            .timecode_tracks
            .iter()
            .map(|t| t.id.val.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "4"]);
        assert_eq!(assembly.tree.timecode_tracks[0].first_frame_timecode.val, "01:00:00:00");
    }

    #[test]
    fn test_diagnostics_cover_all_tracks() {
        let source = MemorySource::new()
            .with_track(StreamKind::General, &[("FileSize", "big")])
            .with_track(StreamKind::Audio, &[("Channels", "2")])
            .with_track(StreamKind::Audio, &[("Channels", "stereo")]);

        let assembly = assemble(&source, "a.m4a", AssembleOptions::default());
        assert_eq!(assembly.tree.audio_tracks.len(), 2);
        assert_eq!(assembly.tree.audio_tracks[0].channels.val, 2);
        assert_eq!(assembly.tree.audio_tracks[1].channels.val, 0);

        let fields: Vec<(StreamKind, usize, &str)> = assembly
            .diagnostics
            .iter()
            .map(|d| (d.kind, d.track, d.field))
            .collect();
        assert_eq!(
            fields,
            vec![(StreamKind::General, 0, "FileSize"), (StreamKind::Audio, 1, "Channels")]
        );
    }
}
