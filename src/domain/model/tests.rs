// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;

    #[test]
    fn test_value_defaults_are_zero() {
        let int = IntValue::default();
        assert_eq!(int.val, 0);
        assert!(int.extra.is_empty());

        let string = StringValue::default();
        assert_eq!(string.val, "");

        let flag = BoolValue::default();
        assert!(!flag.val);

        let time = TimeValue::default();
        assert!(time.is_zero());
    }

    #[test]
    fn test_value_with_extra() {
        let extra = Extra {
            measure: " pixels".to_string(),
            name_text: "Width".to_string(),
            info: "Width (aperture size if present) in pixel".to_string(),
        };
        let width = IntValue::new(1920).with_extra(extra.clone());

        assert_eq!(width.val, 1920);
        assert_eq!(width.extra, extra);
        assert!(!width.extra.is_empty());
        assert_eq!(format!("{}", width), "1920 pixels");
    }

    #[test]
    fn test_stream_kind_names() {
        for kind in StreamKind::ALL {
            assert_eq!(StreamKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(StreamKind::from_name("Chapters"), None);
        assert_eq!(StreamKind::from_name("video"), None);
        assert_eq!(format!("{}", StreamKind::Other), "Other");
    }

    #[test]
    fn test_default_tracks_are_fully_zeroed() {
        let video = VideoTrack::default();
        assert_eq!(video.bit_depth.val, 0);
        assert_eq!(video.format.val, "");
        assert!(video.encoded_date.is_zero());

        let audio = AudioTrack::default();
        assert_eq!(audio.channels.val, 0);
        assert_eq!(audio.sampling_count.val, 0);

        let timecode = TimecodeTrack::default();
        assert_eq!(timecode.id.val, "");
    }

    #[test]
    fn test_tree_track_helpers() {
        let mut tree = MetadataTree::default();
        assert_eq!(tree.total_tracks(), 0);
        assert!(tree.primary_video_track().is_none());

        tree.video_tracks.push(VideoTrack {
            id: IntValue::new(1),
            ..VideoTrack::default()
        });
        tree.audio_tracks.push(AudioTrack::default());
        tree.audio_tracks.push(AudioTrack::default());
        tree.timecode_tracks.push(TimecodeTrack::default());

        assert_eq!(tree.total_tracks(), 4);
        assert_eq!(tree.primary_video_track().map(|v| v.id.val), Some(1));
        assert!(tree.primary_audio_track().is_some());
    }

    #[test]
    fn test_tree_serializes_typed_values() {
        let tree = MetadataTree {
            file: "clip.mov".to_string(),
            locator: "/media/clip.mov".to_string(),
            general: GeneralInfo {
                file_size: Int64Value::new(1053651),
                ..GeneralInfo::default()
            },
            ..MetadataTree::default()
        };

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["file"], "clip.mov");
        assert_eq!(json["general"]["file_size"]["val"], 1053651);
        assert_eq!(json["general"]["file_size"]["extra"]["measure"], "");
        assert!(json["video_tracks"].as_array().unwrap().is_empty());
    }
}
