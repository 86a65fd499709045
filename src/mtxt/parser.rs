//! MTXT text -> event model
//!
//! Line-oriented parsing with ordered production rules: header lines, track
//! sections, then event/directive lines. Any error rejects the whole
//! document so hand edits apply all-or-nothing.

use crate::models::{Directive, Event, Song, Track};

use super::escape::unescape_string;
use super::{from_hex, meta_kind_from_name, MtxtParseError, Result};

/// Parse an MTXT document into a song
pub fn parse_mtxt(text: &str) -> Result<Song> {
    let mut ppq: Option<u16> = None;
    let mut tracks: Vec<Track> = Vec::new();
    let mut last_line = 0;

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        last_line = line;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = tokenize(trimmed, line)?;

        match tokens[0].text.as_str() {
            "mtxt" => {
                let version = expect_bare(&tokens, 1, line, "mtxt version")?;
                if version != "1" {
                    return Err(syntax(line, format!("unsupported mtxt version '{}'", version)));
                }
            }
            "ppq" => {
                if ppq.is_some() {
                    return Err(syntax(line, "duplicate ppq header".to_string()));
                }
                let value = expect_bare(&tokens, 1, line, "ppq value")?;
                let parsed: i64 = value
                    .parse()
                    .map_err(|_| syntax(line, format!("ppq is not a number: '{}'", value)))?;
                if parsed < 1 || parsed > u16::MAX as i64 {
                    return Err(MtxtParseError::FieldRange {
                        line,
                        field: "ppq".to_string(),
                        value: parsed,
                    });
                }
                ppq = Some(parsed as u16);
            }
            "track" => {
                let value = expect_bare(&tokens, 1, line, "track index")?;
                let parsed: usize = value
                    .parse()
                    .map_err(|_| syntax(line, format!("track index is not a number: '{}'", value)))?;
                if parsed != tracks.len() {
                    return Err(syntax(
                        line,
                        format!("track {} out of sequence (expected {})", parsed, tracks.len()),
                    ));
                }
                tracks.push(Track::new());
            }
            _ => {
                let ppq = ppq
                    .ok_or_else(|| syntax(line, "ppq header must appear before events".to_string()))?;
                let track = tracks
                    .last_mut()
                    .ok_or_else(|| syntax(line, "event outside of a track section".to_string()))?;
                let (time, event) = parse_event_line(&tokens, ppq, line)?;
                track.push(time, event);
            }
        }
    }

    let ppq = ppq.ok_or_else(|| syntax(last_line, "missing ppq header".to_string()))?;
    if tracks.is_empty() {
        return Err(syntax(last_line, "document contains no tracks".to_string()));
    }

    Ok(Song { ppq, tracks })
}

/// One whitespace-separated token; quoted tokens are already unescaped
struct Token {
    text: String,
    quoted: bool,
}

fn tokenize(line: &str, line_no: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        if chars[i] == '"' {
            // Scan to the closing quote, honoring backslash escapes
            let start = i + 1;
            let mut j = start;
            while j < chars.len() {
                if chars[j] == '\\' {
                    j += 2;
                    continue;
                }
                if chars[j] == '"' {
                    break;
                }
                j += 1;
            }
            if j >= chars.len() {
                return Err(syntax(line_no, "unterminated string".to_string()));
            }
            let raw: String = chars[start..j].iter().collect();
            tokens.push(Token {
                text: unescape_string(&raw),
                quoted: true,
            });
            i = j + 1;
        } else {
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            tokens.push(Token {
                text: chars[start..i].iter().collect(),
                quoted: false,
            });
        }
    }

    Ok(tokens)
}

fn parse_event_line(tokens: &[Token], ppq: u16, line: usize) -> Result<(u64, Event)> {
    let time = parse_time(&tokens[0], ppq, line)?;
    let tag = tokens
        .get(1)
        .filter(|t| !t.quoted)
        .ok_or_else(|| syntax(line, "missing event type after timestamp".to_string()))?;

    if let Some(name) = tag.text.strip_prefix('@') {
        if name.is_empty() {
            return Err(syntax(line, "directive has no name".to_string()));
        }
        let args = tokens[2..].iter().map(|t| t.text.clone()).collect();
        return Ok((time, Event::Directive(Directive::new(name, args))));
    }

    let event = match tag.text.as_str() {
        "on" => Event::NoteOn {
            channel: named_u8(tokens, 2, "ch", 15, line)?,
            key: named_u8(tokens, 3, "key", 127, line)?,
            velocity: named_u8(tokens, 4, "vel", 127, line)?,
        },
        "off" => Event::NoteOff {
            channel: named_u8(tokens, 2, "ch", 15, line)?,
            key: named_u8(tokens, 3, "key", 127, line)?,
            velocity: named_u8(tokens, 4, "vel", 127, line)?,
        },
        "cc" => Event::ControlChange {
            channel: named_u8(tokens, 2, "ch", 15, line)?,
            controller: named_u8(tokens, 3, "ctrl", 127, line)?,
            value: named_u8(tokens, 4, "val", 127, line)?,
        },
        "prog" => Event::ProgramChange {
            channel: named_u8(tokens, 2, "ch", 15, line)?,
            program: named_u8(tokens, 3, "num", 127, line)?,
        },
        "meta" => parse_meta(tokens, line)?,
        _ => {
            return Err(MtxtParseError::UnknownEventType {
                line,
                tag: tag.text.clone(),
            })
        }
    };

    Ok((time, event))
}

/// `beat:tick` -> absolute ticks
fn parse_time(token: &Token, ppq: u16, line: usize) -> Result<u64> {
    if token.quoted {
        return Err(syntax(line, "timestamp must not be quoted".to_string()));
    }
    let (beat_str, tick_str) = token
        .text
        .split_once(':')
        .ok_or_else(|| syntax(line, format!("bad timestamp '{}' (expected beat:tick)", token.text)))?;
    let beat: u64 = beat_str
        .parse()
        .map_err(|_| syntax(line, format!("bad beat number '{}'", beat_str)))?;
    let tick: u64 = tick_str
        .parse()
        .map_err(|_| syntax(line, format!("bad tick number '{}'", tick_str)))?;
    Ok(beat * ppq as u64 + tick)
}

fn parse_meta(tokens: &[Token], line: usize) -> Result<Event> {
    let kind_token = tokens
        .get(2)
        .filter(|t| !t.quoted)
        .ok_or_else(|| syntax(line, "meta line needs a kind".to_string()))?;

    let kind = if let Some(kind) = meta_kind_from_name(&kind_token.text) {
        kind
    } else {
        let parsed = if let Some(hex) = kind_token.text.strip_prefix("0x") {
            i64::from_str_radix(hex, 16).ok()
        } else {
            kind_token.text.parse::<i64>().ok()
        };
        let value = parsed
            .ok_or_else(|| syntax(line, format!("unknown meta kind '{}'", kind_token.text)))?;
        if !(0..=0xFF).contains(&value) {
            return Err(MtxtParseError::FieldRange {
                line,
                field: "meta kind".to_string(),
                value,
            });
        }
        value as u8
    };

    let payload = tokens
        .get(3)
        .ok_or_else(|| syntax(line, "meta line needs a payload".to_string()))?;

    let data = if payload.quoted {
        payload.text.as_bytes().to_vec()
    } else if let Some(hex) = payload.text.strip_prefix("data=") {
        from_hex(hex).ok_or_else(|| syntax(line, format!("bad hex payload '{}'", hex)))?
    } else {
        return Err(syntax(
            line,
            "meta payload must be a quoted string or data=<hex>".to_string(),
        ));
    };

    Ok(Event::Meta { kind, data })
}

/// Parse `name=<number>` at a fixed position, enforcing the field's domain
fn named_u8(tokens: &[Token], index: usize, name: &str, max: u8, line: usize) -> Result<u8> {
    let token = tokens
        .get(index)
        .filter(|t| !t.quoted)
        .ok_or_else(|| syntax(line, format!("missing field '{}='", name)))?;
    let value_str = token
        .text
        .strip_prefix(&format!("{}=", name))
        .ok_or_else(|| syntax(line, format!("expected '{}=', found '{}'", name, token.text)))?;
    let value: i64 = value_str
        .parse()
        .map_err(|_| syntax(line, format!("field '{}' is not a number: '{}'", name, value_str)))?;
    if value < 0 || value > max as i64 {
        return Err(MtxtParseError::FieldRange {
            line,
            field: name.to_string(),
            value,
        });
    }
    Ok(value as u8)
}

fn expect_bare(tokens: &[Token], index: usize, line: usize, what: &str) -> Result<String> {
    tokens
        .get(index)
        .filter(|t| !t.quoted)
        .map(|t| t.text.clone())
        .ok_or_else(|| syntax(line, format!("missing {}", what)))
}

fn syntax(line: usize, reason: String) -> MtxtParseError {
    MtxtParseError::Syntax { line, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::meta_kind;

    const DOC: &str = "\
mtxt 1
ppq 480

track 0
  0:000 on ch=0 key=60 vel=100
  1:000 off ch=0 key=60 vel=0
  1:000 cc ch=0 ctrl=64 val=127
  2:000 prog ch=0 num=24
  0:000 meta tempo data=07A120
  4:000 @marker \"Chorus\"
";

    #[test]
    fn test_parses_document() {
        let song = parse_mtxt(DOC).unwrap();
        assert_eq!(song.ppq, 480);
        assert_eq!(song.tracks.len(), 1);
        assert_eq!(song.tracks[0].events.len(), 6);

        let events = &song.tracks[0].events;
        assert_eq!(events[0].time, 0);
        assert_eq!(
            events[0].event,
            Event::NoteOn {
                channel: 0,
                key: 60,
                velocity: 100
            }
        );
        assert_eq!(events[4].event, Event::Meta {
            kind: meta_kind::TEMPO,
            data: vec![0x07, 0xA1, 0x20]
        });
        assert_eq!(
            events[5].event,
            Event::Directive(Directive::new("marker", vec!["Chorus".to_string()]))
        );
        assert_eq!(events[5].time, 4 * 480);
    }

    #[test]
    fn test_out_of_range_velocity_rejected() {
        let doc = "ppq 480\ntrack 0\n  0:000 on ch=0 key=60 vel=200\n";
        let err = parse_mtxt(doc).unwrap_err();
        assert_eq!(
            err,
            MtxtParseError::FieldRange {
                line: 3,
                field: "vel".to_string(),
                value: 200
            }
        );
    }

    #[test]
    fn test_out_of_range_channel_rejected() {
        let doc = "ppq 480\ntrack 0\n  0:000 on ch=16 key=60 vel=100\n";
        let err = parse_mtxt(doc).unwrap_err();
        assert!(matches!(err, MtxtParseError::FieldRange { line: 3, .. }));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let doc = "ppq 480\ntrack 0\n  0:000 bend ch=0 key=60 vel=100\n";
        let err = parse_mtxt(doc).unwrap_err();
        assert_eq!(
            err,
            MtxtParseError::UnknownEventType {
                line: 3,
                tag: "bend".to_string()
            }
        );
    }

    #[test]
    fn test_event_before_track_rejected() {
        let doc = "ppq 480\n0:000 on ch=0 key=60 vel=100\n";
        assert!(matches!(
            parse_mtxt(doc).unwrap_err(),
            MtxtParseError::Syntax { line: 2, .. }
        ));
    }

    #[test]
    fn test_missing_ppq_rejected() {
        let doc = "track 0\n  0:000 on ch=0 key=60 vel=100\n";
        assert!(matches!(
            parse_mtxt(doc).unwrap_err(),
            MtxtParseError::Syntax { line: 2, .. }
        ));
    }

    #[test]
    fn test_zero_ppq_rejected() {
        let doc = "ppq 0\ntrack 0\n";
        assert!(matches!(
            parse_mtxt(doc).unwrap_err(),
            MtxtParseError::FieldRange { line: 1, .. }
        ));
    }

    #[test]
    fn test_track_out_of_sequence_rejected() {
        let doc = "ppq 480\ntrack 1\n";
        assert!(matches!(
            parse_mtxt(doc).unwrap_err(),
            MtxtParseError::Syntax { line: 2, .. }
        ));
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let doc = "# header comment\nppq 480\n\ntrack 0\n  # inline note\n  0:000 on ch=0 key=60 vel=100\n";
        let song = parse_mtxt(doc).unwrap();
        assert_eq!(song.tracks[0].events.len(), 1);
    }

    #[test]
    fn test_quoted_meta_payload() {
        let doc = "ppq 480\ntrack 0\n  0:000 meta marker \"A \\\"B\\\"\"\n";
        let song = parse_mtxt(doc).unwrap();
        assert_eq!(
            song.tracks[0].events[0].event,
            Event::Meta {
                kind: meta_kind::MARKER,
                data: b"A \"B\"".to_vec()
            }
        );
    }

    #[test]
    fn test_unterminated_string_rejected() {
        let doc = "ppq 480\ntrack 0\n  0:000 meta marker \"oops\n";
        assert!(matches!(
            parse_mtxt(doc).unwrap_err(),
            MtxtParseError::Syntax { line: 3, .. }
        ));
    }

    #[test]
    fn test_whole_document_rejected_on_late_error() {
        let doc = "ppq 480\ntrack 0\n  0:000 on ch=0 key=60 vel=100\n  1:000 on ch=0 key=60 vel=200\n";
        assert!(parse_mtxt(doc).is_err());
    }
}
