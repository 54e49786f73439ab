use quick_xml::escape::escape;

use crate::pitch::Accidental;
use crate::session::StaffFrame;
use crate::speller::SpelledNote;

/// Convert a staff frame to a single-measure MusicXML score.
///
/// The held notes become one whole-note chord in treble clef. An empty frame
/// produces a whole-measure rest.
pub fn to_musicxml(frame: &StaffFrame) -> String {
    let mut xml = String::new();

    // XML declaration and doctype
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');

    xml.push_str(r#"<score-partwise version="4.0">"#);
    xml.push('\n');

    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\">\n");
    xml.push_str("      <part-name print-object=\"no\"></part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");

    xml.push_str("  <part id=\"P1\">\n");
    xml.push_str("    <measure number=\"1\">\n");

    xml.push_str("      <attributes>\n");
    xml.push_str("        <divisions>1</divisions>\n");
    xml.push_str("        <key>\n");
    xml.push_str(&format!("          <fifths>{}</fifths>\n", frame.fifths));
    xml.push_str("          <mode>major</mode>\n");
    xml.push_str("        </key>\n");
    xml.push_str("        <time print-object=\"no\">\n");
    xml.push_str("          <beats>4</beats>\n");
    xml.push_str("          <beat-type>4</beat-type>\n");
    xml.push_str("        </time>\n");
    xml.push_str("        <clef>\n");
    xml.push_str("          <sign>G</sign>\n");
    xml.push_str("          <line>2</line>\n");
    xml.push_str("        </clef>\n");
    xml.push_str("      </attributes>\n");

    if let Some(chord) = &frame.chord {
        xml.push_str("      <direction placement=\"above\">\n");
        xml.push_str("        <direction-type>\n");
        xml.push_str(&format!("          <words>{}</words>\n", escape(chord.as_str())));
        xml.push_str("        </direction-type>\n");
        xml.push_str("      </direction>\n");
    }

    if frame.notes.is_empty() {
        xml.push_str("      <note>\n");
        xml.push_str("        <rest measure=\"yes\"/>\n");
        xml.push_str("        <duration>4</duration>\n");
        xml.push_str("      </note>\n");
    }

    for (i, note) in frame.notes.iter().enumerate() {
        xml.push_str(&note_to_xml(note, i > 0));
    }

    xml.push_str("    </measure>\n");
    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");

    xml
}

fn note_to_xml(note: &SpelledNote, in_chord: bool) -> String {
    let mut xml = String::new();

    xml.push_str("      <note>\n");
    if in_chord {
        xml.push_str("        <chord/>\n");
    }

    xml.push_str("        <pitch>\n");
    xml.push_str(&format!("          <step>{}</step>\n", note.letter));
    if note.chromatic_accidental != Accidental::Natural {
        xml.push_str(&format!(
            "          <alter>{}</alter>\n",
            note.chromatic_accidental.alter()
        ));
    }
    // MusicXML uses scientific octaves (middle C = 4)
    xml.push_str(&format!(
        "          <octave>{}</octave>\n",
        note.midi_note.value() as i32 / 12 - 1
    ));
    xml.push_str("        </pitch>\n");

    xml.push_str("        <duration>4</duration>\n");
    xml.push_str("        <type>whole</type>\n");

    if let Some(name) = note.rendered_accidental.musicxml_name() {
        xml.push_str(&format!("        <accidental>{}</accidental>\n", name));
    }

    xml.push_str("      </note>\n");
    xml
}
