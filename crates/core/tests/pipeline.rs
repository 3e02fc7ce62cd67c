use limesub_core::{convert, resample, Config, Format, Resolution};

fn dialogue_lines(doc: &str) -> Vec<&str> {
    doc.lines().filter(|l| l.starts_with("Dialogue:")).collect()
}

/// Two identical all-caps cues 50 ms apart become one signage event.
#[test]
fn srt_repeat_collapses_to_single_signage_event() {
    let srt = "1\n00:00:00,000 --> 00:00:02,000\nHELLO\n\n2\n00:00:02,050 --> 00:00:04,000\nHELLO\n";
    let doc = convert(Format::Srt, srt.as_bytes(), &Config::default()).unwrap();
    assert_eq!(
        dialogue_lines(&doc),
        vec!["Dialogue: 0,0:00:00.00,0:00:04.00,tanda,,0,0,0,,HELLO"]
    );
}

/// A tighter tolerance keeps the same repeat apart.
#[test]
fn tolerance_is_configurable() {
    let srt = "1\n00:00:00,000 --> 00:00:02,000\nHELLO\n\n2\n00:00:02,050 --> 00:00:04,000\nHELLO\n";
    let cfg = Config {
        tolerance_secs: 0.02,
        ..Config::default()
    };
    let doc = convert(Format::Srt, srt.as_bytes(), &cfg).unwrap();
    assert_eq!(dialogue_lines(&doc).len(), 2);
}

/// The same cues through SRT and JSON produce identical events.
#[test]
fn decoders_are_format_agnostic() {
    let srt = "1\n00:00:01,000 --> 00:00:03,000\nHow are you?\nFINE\n\n\
               2\n00:00:01,000 --> 00:00:03,000\nGood.\n\n\
               3\n00:00:05,000 --> 00:00:06,500\n(laughs)\n";
    let json = r#"{"events":[
        {"tStartMs":1000,"dDurationMs":2000,"segs":[{"utf8":"How are you?\nFINE"}]},
        {"tStartMs":1000,"dDurationMs":2000,"segs":[{"utf8":"Good."}]},
        {"tStartMs":5000,"dDurationMs":1500,"segs":[{"utf8":"(laughs)"}]}
    ]}"#;
    let cfg = Config::default();
    let from_srt = convert(Format::Srt, srt.as_bytes(), &cfg).unwrap();
    let from_json = convert(Format::Json, json.as_bytes(), &cfg).unwrap();
    assert_eq!(dialogue_lines(&from_srt), dialogue_lines(&from_json));
    assert_eq!(
        dialogue_lines(&from_srt),
        vec![
            "Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\\blur3}{\\fad(00,40)}How are you?\\NGood.",
            "Dialogue: 0,0:00:01.00,0:00:03.00,tanda,,0,0,0,,FINE",
            "Dialogue: 0,0:00:05.00,0:00:06.50,tanda,,0,0,0,,(laughs)",
        ]
    );
}

#[test]
fn ttml_and_xml_feed_the_same_pipeline() {
    let ttml = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div>
        <p begin="00:00:01.000" end="00:00:02.000">Hi<br>there</p>
    </div></body></tt>"#;
    let xml = "<subs><dia><st>00:00:01.000</st><et>00:00:02.000</et><sub><![CDATA[Hi\nthere]]></sub></dia></subs>";
    let cfg = Config::default();
    let a = convert(Format::Ttml, ttml.as_bytes(), &cfg).unwrap();
    let b = convert(Format::Xml, xml.as_bytes(), &cfg).unwrap();
    assert_eq!(dialogue_lines(&a), dialogue_lines(&b));
    assert_eq!(
        dialogue_lines(&a),
        vec!["Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\blur3}{\\fad(00,40)}Hi\\Nthere"]
    );
}

/// An intentional empty row inside a cue is kept as a double break.
#[test]
fn interior_blank_row_survives() {
    let json = r#"[{"start":1000,"duration":2000,"text":"a\n\nb"}]"#;
    let doc = convert(Format::Json, json.as_bytes(), &Config::default()).unwrap();
    assert_eq!(
        dialogue_lines(&doc),
        vec!["Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\\blur3}{\\fad(00,40)}a\\N\\Nb"]
    );
}

/// Timestamps at the edge of the range do not overflow.
#[test]
fn huge_timestamps_do_not_panic() {
    let json = r#"[{"start":9223372036854775807,"text":"x"}]"#;
    let doc = convert(Format::Json, json.as_bytes(), &Config::default()).unwrap();
    assert_eq!(dialogue_lines(&doc).len(), 1);
    let ttml = r#"<tt><body><p begin="99999999999999999999ms">x</p></body></tt>"#;
    let doc = convert(Format::Ttml, ttml.as_bytes(), &Config::default()).unwrap();
    assert_eq!(dialogue_lines(&doc).len(), 1);
}

/// Output is ordered by start time.
#[test]
fn events_are_time_ordered() {
    let json = r#"[{"start":9000,"text":"c"},{"start":1000,"text":"a"},{"start":5000,"text":"b"}]"#;
    let doc = convert(Format::Json, json.as_bytes(), &Config::default()).unwrap();
    let starts: Vec<&str> = dialogue_lines(&doc)
        .iter()
        .map(|l| l.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(starts, vec!["0:00:01.00", "0:00:05.00", "0:00:09.00"]);
}

#[test]
fn resample_targets_configured_resolution() {
    let doc = "[Script Info]\nPlayResX: 1920\nPlayResY: 1080\n\n[V4+ Styles]\n\
               Style: Default,Arial,60,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,3,0,2,30,30,45,1\n\n\
               [Events]\nDialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\pos(960,540)}x\n";
    let cfg = Config {
        target: Resolution::new(1280, 720),
        ..Config::default()
    };
    let out = resample(doc, &cfg);
    assert!(out.contains("PlayResX: 1280\nPlayResY: 720"));
    assert!(out.contains("Style: Default,Basic Comical NC,40,"));
    assert!(out.contains(",1,2,0,2,20,20,30,1"));
    assert!(out.contains("{\\pos(640,360)}x"));
}
