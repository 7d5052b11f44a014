mod dummy;
mod port;

pub use self::dummy::{
	DummyDevice,
};

pub use self::port::{
	I2cPort,
	scan_bus,
};
