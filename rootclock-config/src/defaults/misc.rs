pub fn refresh_sec() -> u32 {
    1
}
