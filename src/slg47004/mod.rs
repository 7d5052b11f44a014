//! SLG47004 GreenPAK device: memory space addressing and the paged
//! read/erase/write protocol.
//!
//! The chip answers on three bus addresses, one per memory space, all
//! derived from the 4-bit family prefix 0b0001. Each space is 256 bytes
//! split into sixteen 16-byte pages; every paged transaction addresses
//! exactly one page.

mod paged;
mod spaces;

pub use self::paged::{
	PAGE_COUNT,
	PAGE_SIZE,
	PageError,
	PageOp,
	erase_all,
	erase_page,
	program,
	read_all,
	verify,
	write_all,
};

pub use self::spaces::{
	BASE_ADDRESS,
	ERASE_REGISTER,
	MemorySpace,
};
