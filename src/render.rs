use crate::types::{Item, PackedBox};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Top view of a packed box: the width runs left to right, the height top to
/// bottom. Items stacked in depth are drawn over each other.
pub fn render_box<I: Item>(bx: &PackedBox<'_, I>) -> String {
    let [box_w, box_h, _] = bx.template.dimensions();
    let scale = f64::min(MAX_WIDTH / box_w as f64, MAX_HEIGHT / box_h as f64);
    let grid_w = (box_w as f64 * scale).round() as usize;
    let grid_h = (box_h as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for bi in &bx.items {
        let [w, h, _] = bi.dimensions();
        let sx = (bi.position[0] as f64 * scale).round() as usize;
        let sy = (bi.position[1] as f64 * scale).round() as usize;
        let sw = (w as f64 * scale).round() as usize;
        let sh = (h as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label = format!("{}x{}", w, h);
        let label_chars: Vec<char> = label.chars().collect();

        if sw > 2 && sh > 0 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let half = label_chars.len() / 2;
            let start_x = cx.saturating_sub(half);

            for (i, &ch) in label_chars.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for i in x..=x + w {
        draw_edge(grid, i, y, '-');
        draw_edge(grid, i, y + h, '-');
    }
    for j in y..=y + h {
        draw_edge(grid, x, j, '|');
        draw_edge(grid, x + w, j, '|');
    }
    for (cx, cy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
        if let Some(cell) = grid.get_mut(cy).and_then(|row| row.get_mut(cx)) {
            *cell = '+';
        }
    }
}

/// Crossing edges become corners.
fn draw_edge(grid: &mut [Vec<char>], x: usize, y: usize, edge: char) {
    let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) else {
        return;
    };
    *cell = match (*cell, edge) {
        ('+', _) | ('|', '-') | ('-', '|') => '+',
        _ => edge,
    };
}
