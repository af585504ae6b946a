/// log2 of the number of bits in a byte
pub const LOG_BITS_IN_BYTE: u8 = 3;
/// The number of bits in a byte
pub const BITS_IN_BYTE: usize = 1 << LOG_BITS_IN_BYTE;

#[cfg(target_pointer_width = "32")]
/// log2 of the number of bytes in an address
pub const LOG_BYTES_IN_ADDRESS: u8 = 2;
#[cfg(target_pointer_width = "64")]
/// log2 of the number of bytes in an address
pub const LOG_BYTES_IN_ADDRESS: u8 = 3;
/// The number of bytes in an address
pub const BYTES_IN_ADDRESS: usize = 1 << LOG_BYTES_IN_ADDRESS;

/// log2 of the number of bytes in a word
pub const LOG_BYTES_IN_WORD: u8 = LOG_BYTES_IN_ADDRESS;
/// The number of bytes in a word
pub const BYTES_IN_WORD: usize = 1 << LOG_BYTES_IN_WORD;
/// log2 of the number of bits in a word
pub const LOG_BITS_IN_WORD: usize = LOG_BITS_IN_BYTE as usize + LOG_BYTES_IN_WORD as usize;
/// The number of bits in a word
pub const BITS_IN_WORD: usize = 1 << LOG_BITS_IN_WORD;

/// log2 of the number of bytes in a compressed (32-bit) reference slot
pub const LOG_BYTES_IN_COMPRESSED_SLOT: u8 = 2;
/// The number of bytes in a compressed reference slot
pub const BYTES_IN_COMPRESSED_SLOT: usize = 1 << LOG_BYTES_IN_COMPRESSED_SLOT;

/// The number of slots one scan map can describe. A scan map is a machine word, so this is
/// also the largest number of slots in one scan segment.
pub const BITS_PER_SCAN_MAP: usize = BITS_IN_WORD;

/// A scan map with every bit set.
pub const FULL_SCAN_MAP: usize = usize::MAX;

/// The default number of array elements a fresh array scanner claims before the rest of the
/// array is left for splitting.
pub const DEFAULT_ARRAY_SPLIT_AMOUNT: usize = 1024;

static_assertions::const_assert_eq!(BITS_PER_SCAN_MAP, usize::BITS as usize);
static_assertions::const_assert_eq!(BYTES_IN_WORD, std::mem::size_of::<usize>());
