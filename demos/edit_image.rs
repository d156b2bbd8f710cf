//! Offline editing: decode, edit and re-encode a saved memory image
//!
//! This example demonstrates:
//! - Opening a session over a saved 64 KiB image with no radio attached
//! - Programming an ordinary channel and renaming a weather slot
//! - Which fields a special slot locks
//! - Dirty tracking: which 256-byte blocks an upload would send
//! - What a failed upload leaves behind

use thd72_clone::prelude::*;

// ============ Image Layout ============
// A blank image is all 0xFF: every flag reads as "empty" and every name is
// pad bytes. A real one would come from a file written after `sync_in`.
const IMAGE_SIZE: usize = 0x10000;

fn main() -> Result<(), RadioError> {
    let saved = vec![0xFF; IMAGE_SIZE];
    let mut radio = Thd72::from_image(NullTransport, LinkConfig::default(), &saved)?;
    println!("loaded image, dirty blocks: {:?}", radio.dirty_blocks().to_vec());

    // ============ Ordinary Channel ============
    let mut ch = radio.get_memory(12)?;
    println!("slot 12 empty: {}", ch.empty);

    ch.empty = false;
    ch.name = "SIMPLEX".into();
    ch.freq = 146_520_000;
    ch.tmode = ToneMode::Tone;
    ch.rtone = 1000; // 100.0 Hz
    ch.skip = Skip::Skip;
    radio.set_memory(&ch)?;

    let ch = radio.get_memory(12)?;
    println!("slot 12: {} {} Hz {} {}", ch.name, ch.freq, ch.tmode, ch.rtone);
    println!("{}", radio.raw_memory(12)?);

    // ============ Special Locations ============
    // Weather slots only accept a new name; scan edges lock their name.
    let mut wx = radio.get_memory("WX3")?;
    println!(
        "WX3 is slot {}, locks freq: {}, locks name: {}",
        wx.number,
        wx.is_immutable(Field::Freq),
        wx.is_immutable(Field::Name)
    );
    wx.name = "NOAA3".into();
    radio.set_memory(&wx)?;

    let edge = radio.get_memory("L0")?;
    println!("L0 is slot {}, locks name: {}", edge.number, edge.is_immutable(Field::Name));
    println!("special locations: {}", radio.special_locations().join(" "));

    // ============ Dirty Tracking ============
    // Only these blocks would be written by `sync_out`.
    println!("dirty blocks: {:02X?}", radio.dirty_blocks().to_vec());

    // ============ Failed Upload ============
    // No radio answers on a null transport. The dirty set is kept so the
    // same edits can be retried later.
    let before = radio.dirty_blocks().to_vec();
    match radio.sync_out() {
        Ok(written) => println!("wrote {written:?}"),
        Err(e) => println!("upload failed: {e}"),
    }
    assert_eq!(radio.dirty_blocks().to_vec(), before);

    Ok(())
}
