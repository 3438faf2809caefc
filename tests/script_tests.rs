//! Command scripts run against the demo machine, compared by rendered grid.

use pretty_assertions::assert_eq;
use sg_session::{EditSession, EditorConfig};
use stepgrid::demo_machine;
use stepgrid::ui::grid::{render, status};
use stepgrid::ui::input::{parse_script, Command};

fn run(script: &str, tracks: usize, rows: u16) -> EditSession {
    let mut session = EditSession::new(demo_machine(tracks, 0), EditorConfig::default());
    session.new_pattern("00", Some(rows)).unwrap();
    for (line, command) in parse_script(script).unwrap() {
        if let Command::Action(action) = command {
            session
                .dispatch(action)
                .unwrap_or_else(|e| panic!("line {line}: {e}"));
        }
    }
    session
}

const ARPEGGIO: &str = "
# notes down the first track
group track
note C
note E
note G
off
up 3
select
transpose 12

# velocity ramp next to the notes
right
right
digit 4
down 2
digit 7
up 3
begin
down 3
extend
interpolate
";

#[test]
fn arpeggio_with_velocity_ramp() {
    let s = run(ARPEGGIO, 1, 4);
    let expected = "\
pattern 00 (4 rows)
   row | Vo M | Not Ve Cuto
*    0 | .. . | C-5 40 ....
*    1 | .. . | E-5 50 ....
*    2 | .. . | G-5 60 ....
>    3 | .. . | off 70 ....
";
    assert_eq!(render(&s), expected);
    assert_eq!(status(&s), "cursor row 03 Track track 0 param 1 sub 0, selection 00..04 Column");
}

#[test]
fn undo_steps_back_through_the_script() {
    let script = format!("{ARPEGGIO}undo\nundo\nclear-selection\n");
    let s = run(&script, 1, 4);
    let expected = "\
pattern 00 (4 rows)
   row | Vo M | Not Ve Cuto
     0 | .. . | C-5 40 ....
     1 | .. . | E-5 .. ....
     2 | .. . | G-5 .. ....
>    3 | .. . | off .. ....
";
    assert_eq!(render(&s), expected);
    assert_eq!(s.undo_label(), Some("enter value"));
}

#[test]
fn copy_track_into_a_new_pattern() {
    let script = "
group track
note a-3
note b-3
up 2
select
select
copy
new-pattern 01 2
group track
tab
paste
";
    let s = run(script, 2, 2);
    let expected = "\
pattern 01 (2 rows)
   row | Vo M | Not Ve Cuto  Not Ve Cuto
>    0 | .. . | ... .. ....  A-3 .. ....
     1 | .. . | ... .. ....  B-3 .. ....
";
    assert_eq!(render(&s), expected);
}

#[test]
fn parse_errors_report_the_line() {
    let err = parse_script("group track\nnote H\n").unwrap_err();
    assert_eq!(err.to_string(), "line 2: bad argument \"H\" for note");
}
