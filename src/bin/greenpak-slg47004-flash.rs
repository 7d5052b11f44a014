#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate greenpak_slg47004_flash;
use greenpak_slg47004_flash::*;

use std::path::Path;
use std::process::exit;

use greenpak_slg47004_flash::adapter::I2cPort;
use greenpak_slg47004_flash::image::MemoryImage;
use greenpak_slg47004_flash::slg47004::MemorySpace;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn open_port(matches: &clap::ArgMatches) -> AResult<Box<dyn I2cPort>> {
	match matches.value_of("adapter").unwrap_or("dummy") {
		"dummy" => Ok(Box::new(adapter::DummyDevice::new())),
		other => bail!(
			"unknown adapter backend {:?}; only \"dummy\" is built in, USB bridge backends plug in through the I2cPort trait",
			other
		),
	}
}

fn load_image(path: &Path, raw: bool) -> AResult<MemoryImage> {
	if raw {
		image::load_raw_file(path)
	} else {
		image::load_bit_file(path)
	}
}

fn store_image(path: &Path, image: &MemoryImage, raw: bool) -> AResult<()> {
	if raw {
		image::store_raw_file(path, image)
	} else {
		image::store_bit_file(path, image)
	}
}

fn scan(port: &mut dyn I2cPort) -> AResult<()> {
	let found = adapter::scan_bus(port);
	if found.is_empty() {
		eprintln!("no devices found on the bus");
		exit(1);
	}
	for address in found {
		println!("0x{:02x}", address);
	}
	Ok(())
}

fn read(port: &mut dyn I2cPort, sub_m: &clap::ArgMatches) -> AResult<()> {
	let space: MemorySpace = get_param(sub_m, "SPACE")?;
	let image = slg47004::read_all(port, space)?;
	match sub_m.value_of("FILE") {
		Some(file) => store_image(Path::new(file), &image, sub_m.is_present("raw"))?,
		None => print!("{}", image),
	}
	Ok(())
}

fn write(port: &mut dyn I2cPort, sub_m: &clap::ArgMatches) -> AResult<()> {
	let space: MemorySpace = get_param(sub_m, "SPACE")?;
	let file = Path::new(sub_m.value_of("FILE").unwrap());
	let image = load_image(file, sub_m.is_present("raw"))?;

	slg47004::program(port, space, &image)?;
	if sub_m.is_present("no_verify") {
		warn!("skipping verify on request");
	} else {
		slg47004::verify(port, space, &image)?;
		info!("{} verified successfully", space);
	}
	Ok(())
}

fn erase(port: &mut dyn I2cPort, sub_m: &clap::ArgMatches) -> AResult<()> {
	let space: MemorySpace = get_param(sub_m, "SPACE")?;
	slg47004::erase_all(port, space)
}

fn verify(port: &mut dyn I2cPort, sub_m: &clap::ArgMatches) -> AResult<()> {
	let space: MemorySpace = get_param(sub_m, "SPACE")?;
	let file = Path::new(sub_m.value_of("FILE").unwrap());
	let image = load_image(file, sub_m.is_present("raw"))?;
	slg47004::verify(port, space, &image)?;
	println!("{} matches {:?}", space, file);
	Ok(())
}

fn convert(sub_m: &clap::ArgMatches) -> AResult<()> {
	let input = Path::new(sub_m.value_of("INPUT").unwrap());
	let output = Path::new(sub_m.value_of("OUTPUT").unwrap());
	let to_raw = sub_m.is_present("to_raw");
	// the source format is just the other one
	let image = load_image(input, !to_raw)?;
	store_image(output, &image, to_raw)
}

fn show(sub_m: &clap::ArgMatches) -> AResult<()> {
	let file = Path::new(sub_m.value_of("FILE").unwrap());
	let image = load_image(file, sub_m.is_present("raw"))?;
	print!("{}", image);
	Ok(())
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg adapter: -a --adapter +takes_value "adapter backend to use (default: dummy)")
		(@subcommand scan =>
			(about: "probe all bus addresses and list acknowledging devices")
		)
		(@subcommand read =>
			(about: "read a memory space into a file (or hex dump to stdout)")
			(@arg raw: --raw "store raw bytes instead of a bit file")
			(@arg SPACE: +required "memory space (config, nvm, eeprom)")
			(@arg FILE: "output file; hex dump to stdout if omitted")
		)
		(@subcommand write =>
			(about: "erase a memory space, write an image file and verify")
			(@arg raw: --raw "load raw bytes instead of a bit file")
			(@arg no_verify: --("no-verify") "skip the read-back verify")
			(@arg SPACE: +required "memory space (nvm, eeprom)")
			(@arg FILE: +required "input file")
		)
		(@subcommand erase =>
			(about: "erase all pages of a memory space")
			(@arg SPACE: +required "memory space (nvm, eeprom)")
		)
		(@subcommand verify =>
			(about: "compare a memory space against an image file")
			(@arg raw: --raw "load raw bytes instead of a bit file")
			(@arg SPACE: +required "memory space (config, nvm, eeprom)")
			(@arg FILE: +required "image file to compare against")
		)
		(@subcommand convert =>
			(about: "convert between bit file and raw byte file")
			(@arg to_raw: --("to-raw") "convert bit file to raw bytes (default: raw to bit file)")
			(@arg INPUT: +required "input file")
			(@arg OUTPUT: +required "output file")
		)
		(@subcommand show =>
			(about: "hex dump an image file")
			(@arg raw: --raw "load raw bytes instead of a bit file")
			(@arg FILE: +required "image file")
		)
	).get_matches();

	match matches.subcommand() {
		("scan", _) => {
			scan(&mut *open_port(&matches)?)
		}
		("read", Some(sub_m)) => {
			read(&mut *open_port(&matches)?, sub_m)
		}
		("write", Some(sub_m)) => {
			write(&mut *open_port(&matches)?, sub_m)
		}
		("erase", Some(sub_m)) => {
			erase(&mut *open_port(&matches)?, sub_m)
		}
		("verify", Some(sub_m)) => {
			verify(&mut *open_port(&matches)?, sub_m)
		}
		("convert", Some(sub_m)) => {
			convert(sub_m)
		}
		("show", Some(sub_m)) => {
			show(sub_m)
		}
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
