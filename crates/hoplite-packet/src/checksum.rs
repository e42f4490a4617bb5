//! The Internet checksum for `ICMP` over IPv4.
//!
//! This code is derived from [`libpnet`] which is available under the Apache 2.0 license.
//!
//! [`libpnet`]: https://github.com/libpnet/libpnet

/// Calculate the checksum for an `Ipv4` `ICMP` packet.
///
/// The checksum word (the 2nd word) is skipped during summation and so the
/// checksum of a packet may be recalculated whether the checksum field has
/// been filled in or not.
#[must_use]
pub fn icmp_ipv4_checksum(data: &[u8]) -> u16 {
    if data.is_empty() {
        return 0;
    }
    finalize_checksum(sum_be_words(data, 1))
}

/// Sum the big-endian words of the data, skipping the word at `ignore_word`.
///
/// A trailing odd byte is summed as the high byte of a final word.
fn sum_be_words(data: &[u8], ignore_word: usize) -> u32 {
    let len = data.len();
    let mut cur_data = data;
    let mut sum = 0u32;
    let mut i = 0;
    while cur_data.len() >= 2 {
        if i != ignore_word {
            sum += u32::from(u16::from_be_bytes([cur_data[0], cur_data[1]]));
        }
        cur_data = &cur_data[2..];
        i += 1;
    }
    if i != ignore_word && len & 1 != 0 {
        sum += u32::from(data[len - 1]) << 8;
    }
    sum
}

/// Fold the carries back into the low word and complement.
const fn finalize_checksum(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !sum as u16
}
