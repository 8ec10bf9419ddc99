use super::*;
use crate::foundation::core::{GridPos, GridSize};

fn canvas(w: u16, h: u16, layers: usize) -> Canvas {
    Canvas::new(GridSize::new(w, h).unwrap(), layers).unwrap()
}

fn styled(ch: char) -> Cell {
    Cell::new(ch, CellStyle::bright(Color::Cyan))
}

#[test]
fn construction_requires_a_layer() {
    assert!(Canvas::new(GridSize::new(4, 4).unwrap(), 0).is_err());
}

#[test]
fn set_cell_rejects_bad_layer_and_drops_out_of_grid() {
    let mut c = canvas(8, 4, 2);
    assert!(matches!(
        c.set_cell(2, GridPos::new(0, 0), styled('x')),
        Err(BeatgridError::Canvas(_))
    ));

    // Out-of-grid coordinates are dropped, not errors.
    c.set_cell(0, GridPos::new(-1, 0), styled('x')).unwrap();
    c.set_cell(0, GridPos::new(8, 0), styled('x')).unwrap();
    c.set_cell(0, GridPos::new(0, 4), styled('x')).unwrap();
    assert!(c.composite().cells().iter().all(|cell| cell.is_blank()));
}

#[test]
fn composite_is_idempotent() {
    let mut c = canvas(6, 3, 3);
    c.set_string(1, GridPos::new(1, 1), "abc", CellStyle::fg(Color::Green))
        .unwrap();
    let first = c.composite().clone();
    let second = c.composite().clone();
    assert_eq!(first, second);
}

#[test]
fn higher_layers_occlude_lower_ones() {
    let mut c = canvas(5, 5, 3);
    let at = GridPos::new(2, 2);
    c.set_cell(0, at, styled('a')).unwrap();
    c.set_cell(1, at, styled('b')).unwrap();
    c.set_cell(2, at, styled('c')).unwrap();
    assert_eq!(c.composite().cell(at).ch, 'c');

    // A blank cell on a higher layer is transparent, not occluding.
    c.set_cell(2, at, Cell::BLANK).unwrap();
    assert_eq!(c.composite().cell(at).ch, 'b');
}

#[test]
fn set_string_clips_at_the_row_edge() {
    let mut c = canvas(4, 2, 1);
    c.set_string(0, GridPos::new(2, 0), "wxyz", CellStyle::default())
        .unwrap();
    let frame = c.composite();
    let row: String = (0..4).map(|x| frame.cell(GridPos::new(x, 0)).ch).collect();
    assert_eq!(row, "  wx");
    // Nothing wrapped onto the next row.
    assert!((0..4).all(|x| frame.cell(GridPos::new(x, 1)).is_blank()));
}

#[test]
fn multiline_stops_at_the_bottom_edge() {
    let mut c = canvas(6, 2, 1);
    c.set_multiline(0, GridPos::new(0, 1), "aa\nbb\ncc", CellStyle::default())
        .unwrap();
    let frame = c.composite();
    assert_eq!(frame.cell(GridPos::new(0, 1)).ch, 'a');
    // Rows beyond the grid were skipped without wrapping.
    assert_eq!(frame.cell(GridPos::new(0, 0)).ch, ' ');
}

#[test]
fn clear_layer_only_touches_its_layer() {
    let mut c = canvas(4, 4, 2);
    let at = GridPos::new(1, 1);
    c.set_cell(0, at, styled('a')).unwrap();
    c.set_cell(1, at, styled('b')).unwrap();
    c.clear_layer(1).unwrap();
    assert_eq!(c.composite().cell(at).ch, 'a');
}

#[test]
fn fill_rect_and_border_stay_in_bounds() {
    let mut c = canvas(6, 6, 1);
    c.fill_rect(0, GridPos::new(4, 4), 4, 4, styled('#')).unwrap();
    let frame = c.composite();
    assert_eq!(frame.cell(GridPos::new(5, 5)).ch, '#');

    let mut c = canvas(6, 4, 1);
    c.draw_border(
        0,
        GridPos::new(0, 0),
        6,
        4,
        ['+', '-', '+', '|', '|', '+', '-', '+'],
        CellStyle::default(),
    )
    .unwrap();
    let frame = c.composite();
    assert_eq!(frame.cell(GridPos::new(0, 0)).ch, '+');
    assert_eq!(frame.cell(GridPos::new(3, 0)).ch, '-');
    assert_eq!(frame.cell(GridPos::new(0, 2)).ch, '|');
    assert_eq!(frame.cell(GridPos::new(5, 3)).ch, '+');
    assert_eq!(frame.cell(GridPos::new(2, 2)).ch, ' ');
}

#[test]
fn edit_counter_tracks_in_bounds_writes() {
    let mut c = canvas(4, 4, 1);
    assert_eq!(c.edits_this_frame(), 0);
    c.set_cell(0, GridPos::new(0, 0), styled('x')).unwrap();
    c.set_cell(0, GridPos::new(99, 0), styled('x')).unwrap();
    c.set_string(0, GridPos::new(0, 1), "ab", CellStyle::default())
        .unwrap();
    assert_eq!(c.edits_this_frame(), 2);
    assert_eq!(c.take_edit_count(), 2);
    assert_eq!(c.edits_this_frame(), 0);
}
