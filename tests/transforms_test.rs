//! Transform engine integration tests
//!
//! The documented behavioral contract: no-op defaults, clamping instead of
//! wrapping, channel-less events surviving filters, and the fixed pass
//! order composing with the codecs.

use mtxt_wasm::models::events::meta_kind;
use mtxt_wasm::transforms::{self, TransformDescriptor};
use mtxt_wasm::{Directive, Event, Song};

fn note(channel: u8, key: u8) -> Event {
    Event::NoteOn {
        channel,
        key,
        velocity: 100,
    }
}

#[test]
fn test_zero_amounts_are_noops() {
    let mut song = Song::new(480);
    song.tracks[0].push(130, note(0, 100));

    for descriptor in [
        TransformDescriptor {
            transpose_amount: 0,
            ..Default::default()
        },
        TransformDescriptor {
            offset_amount: 0.0,
            ..Default::default()
        },
        TransformDescriptor {
            quantize_grid: 0,
            ..Default::default()
        },
    ] {
        let (out, report) = transforms::apply(&song, &descriptor).unwrap();
        assert_eq!(out, song);
        assert!(report.is_empty());
    }
}

#[test]
fn test_transpose_200_clamps_to_127() {
    let mut song = Song::new(480);
    song.tracks[0].push(0, note(0, 100));

    let descriptor = TransformDescriptor {
        transpose_amount: 200,
        ..Default::default()
    };
    let (out, report) = transforms::apply(&song, &descriptor).unwrap();

    assert_eq!(out.tracks[0].events[0].event, note(0, 127));
    assert_eq!(report.keys_clamped, 1);
}

#[test]
fn test_large_negative_offset_clamps_to_zero() {
    let mut song = Song::new(480);
    song.tracks[0].push(0, note(0, 60));

    let descriptor = TransformDescriptor {
        offset_amount: -1000.0,
        ..Default::default()
    };
    let (out, report) = transforms::apply(&song, &descriptor).unwrap();

    assert_eq!(out.tracks[0].events[0].time, 0);
    assert_eq!(report.times_clamped, 1);
}

#[test]
fn test_include_filter_keeps_channels_and_global_meta() {
    let mut song = Song::new(480);
    for channel in [1u8, 2, 3, 4] {
        song.tracks[0].push(0, note(channel, 60));
    }
    song.tracks[0].push(
        0,
        Event::Meta {
            kind: meta_kind::TEMPO,
            data: vec![0x07, 0xA1, 0x20],
        },
    );

    let descriptor = TransformDescriptor {
        include_channels: vec![1, 2],
        ..Default::default()
    };
    let (out, report) = transforms::apply(&song, &descriptor).unwrap();

    let channels: Vec<Option<u8>> = out.tracks[0]
        .events
        .iter()
        .map(|e| e.event.channel())
        .collect();
    assert_eq!(channels, vec![Some(1), Some(2), None]);
    assert_eq!(report.events_dropped, 2);
}

#[test]
fn test_merge_notes_fuses_zero_gap_pair() {
    let mut song = Song::new(480);
    let track = &mut song.tracks[0];
    track.push(0, note(1, 60));
    track.push(
        100,
        Event::NoteOff {
            channel: 1,
            key: 60,
            velocity: 0,
        },
    );
    track.push(100, note(1, 60));
    track.push(
        200,
        Event::NoteOff {
            channel: 1,
            key: 60,
            velocity: 0,
        },
    );

    let descriptor = TransformDescriptor {
        merge_notes: true,
        ..Default::default()
    };
    let (out, _) = transforms::apply(&song, &descriptor).unwrap();

    let shape: Vec<(u64, bool)> = out.tracks[0]
        .events
        .iter()
        .map(|e| (e.time, e.event.is_attack()))
        .collect();
    assert_eq!(shape, vec![(0, true), (200, false)]);
}

#[test]
fn test_sort_by_time_is_idempotent() {
    let mut song = Song::new(480);
    let track = &mut song.tracks[0];
    track.push(960, note(0, 64));
    track.push(0, note(0, 60));
    track.push(
        960,
        Event::Meta {
            kind: meta_kind::MARKER,
            data: b"late".to_vec(),
        },
    );

    let descriptor = TransformDescriptor {
        sort_by_time: true,
        ..Default::default()
    };
    let (once, _) = transforms::apply(&song, &descriptor).unwrap();
    let (twice, _) = transforms::apply(&once, &descriptor).unwrap();

    assert_eq!(once, twice);
    let times: Vec<u64> = once.tracks[0].events.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![0, 960, 960]);
    // marker sorts before the note at the shared tick
    assert_eq!(once.tracks[0].events[1].event.class_rank(), 0);
}

#[test]
fn test_quantize_snaps_through_engine() {
    let mut song = Song::new(480);
    song.tracks[0].push(250, note(0, 60));

    let descriptor = TransformDescriptor {
        quantize_grid: 4,
        ..Default::default()
    };
    let (out, _) = transforms::apply(&song, &descriptor).unwrap();
    assert_eq!(out.tracks[0].events[0].time, 240);
}

#[test]
fn test_apply_then_extract_restores_directive() {
    let mut song = Song::new(480);
    song.tracks[0].push(
        0,
        Event::Directive(Directive::new("tempo", vec!["90".to_string()])),
    );

    let materialize = TransformDescriptor {
        apply_directives: true,
        ..Default::default()
    };
    let (materialized, _) = transforms::apply(&song, &materialize).unwrap();
    assert!(matches!(
        materialized.tracks[0].events[0].event,
        Event::Meta {
            kind: meta_kind::TEMPO,
            ..
        }
    ));

    let extract = TransformDescriptor {
        extract_directives: true,
        ..Default::default()
    };
    let (restored, _) = transforms::apply(&materialized, &extract).unwrap();
    assert_eq!(restored, song);
}

#[test]
fn test_group_channels_keeps_times() {
    let mut song = Song::new(480);
    let track = &mut song.tracks[0];
    track.push(0, note(2, 60));
    track.push(10, note(1, 62));
    track.push(20, note(2, 64));

    let descriptor = TransformDescriptor {
        group_channels: true,
        ..Default::default()
    };
    let (out, _) = transforms::apply(&song, &descriptor).unwrap();

    let layout: Vec<(Option<u8>, u64)> = out.tracks[0]
        .events
        .iter()
        .map(|e| (e.event.channel(), e.time))
        .collect();
    assert_eq!(
        layout,
        vec![(Some(1), 10), (Some(2), 0), (Some(2), 20)]
    );
}

#[test]
fn test_full_pipeline_through_text_codec() {
    // parse -> transform -> serialize, the apply() control flow end-to-end
    let doc = "\
ppq 480
track 0
  0:000 on ch=0 key=60 vel=100
  1:000 off ch=0 key=60 vel=0
";
    let song = mtxt_wasm::mtxt::parse_mtxt(doc).unwrap();
    let descriptor = TransformDescriptor {
        transpose_amount: 12,
        ..Default::default()
    };
    let (out, _) = transforms::apply(&song, &descriptor).unwrap();
    let text = mtxt_wasm::mtxt::write_mtxt(&out, false);

    assert!(text.contains("on ch=0 key=72 vel=100"));
    assert!(text.contains("off ch=0 key=72 vel=0"));
}
