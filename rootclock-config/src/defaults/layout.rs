//! Default block geometry, in pixels.

pub fn block_padding_x() -> i32 {
    48
}

pub fn block_padding_y() -> i32 {
    24
}

pub fn block_y_offset() -> i32 {
    0
}

pub fn line_spacing() -> i32 {
    12
}
