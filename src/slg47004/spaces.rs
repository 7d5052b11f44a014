use std::fmt;
use std::str;

/// 7-bit base address: family prefix 0b0001 in the four most significant
/// bits, space selector in the lowest three. The mapping is fixed by the
/// datasheet, never derived from bus discovery (the prefix can be
/// reprogrammed on the chip, which is out of scope here).
pub const BASE_ADDRESS: u8 = 0x08;

/// Erase control register, reachable through the Config space only.
pub const ERASE_REGISTER: u8 = 0xe3;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum MemorySpace {
	Config,
	Nvm,
	Eeprom,
}

impl MemorySpace {
	pub fn device_address(self) -> u8 {
		match self {
			MemorySpace::Config => BASE_ADDRESS | 0b000,
			MemorySpace::Nvm => BASE_ADDRESS | 0b010,
			MemorySpace::Eeprom => BASE_ADDRESS | 0b011,
		}
	}

	/// Flag bit distinguishing the two erasable spaces in the erase
	/// control byte. Config is not erasable through the erase register.
	pub(super) fn erase_select(self) -> Option<u8> {
		match self {
			MemorySpace::Config => None,
			MemorySpace::Nvm => Some(0x00),
			MemorySpace::Eeprom => Some(0x10),
		}
	}
}

impl fmt::Display for MemorySpace {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			MemorySpace::Config => write!(f, "config"),
			MemorySpace::Nvm => write!(f, "NVM"),
			MemorySpace::Eeprom => write!(f, "EEPROM"),
		}
	}
}

impl str::FromStr for MemorySpace {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"config" => Ok(MemorySpace::Config),
			"nvm" => Ok(MemorySpace::Nvm),
			"eeprom" => Ok(MemorySpace::Eeprom),
			_ => bail!("unknown memory space {:?} (expected config, nvm or eeprom)", s),
		}
	}
}
