use std::error::Error;

use argh::FromArgs;
use chrono::{Local, TimeZone};
use log::info;
use serde_json::{json, Map, Value};

use wn1821::config::{load_host_config, parse_channel_list};
use wn1821::packet::Packet;
use wn1821::{installer, loader, DRIVER_NAME};

#[derive(FromArgs)]
/// Poll a WN1821 station and print each loop packet.
struct Args {
    /// path to a YAML host configuration with a WN1821 section
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// live data URL, overrides the configuration
    #[argh(option)]
    url: Option<String>,

    /// comma separated channels used for outdoor temperature and humidity
    #[argh(option)]
    outdoor_channels: Option<String>,

    /// stop after this many packets
    #[argh(option, short = 'n')]
    count: Option<usize>,

    /// print the installation manifest and exit
    #[argh(switch)]
    manifest: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Args = argh::from_env();

    if args.manifest {
        print!("{}", installer::manifest().to_yaml()?);
        return Ok(());
    }

    let mut config_dict = match &args.config {
        Some(path) => load_host_config(path)?,
        None => {
            info!("No config file specified, using defaults");
            json!({ "WN1821": {} })
        }
    };
    apply_overrides(&mut config_dict, &args)?;

    let mut station = loader(&config_dict)?;
    let packets = station.loop_packets();
    let packets: Box<dyn Iterator<Item = Packet> + '_> = match args.count {
        Some(count) => Box::new(packets.take(count)),
        None => Box::new(packets),
    };

    for packet in packets {
        println!("{} {}", timestamp_to_string(packet.date_time()), packet);
    }

    Ok(())
}

fn apply_overrides(config_dict: &mut Value, args: &Args) -> Result<(), Box<dyn Error>> {
    if args.url.is_none() && args.outdoor_channels.is_none() {
        return Ok(());
    }

    let section = config_dict
        .as_object_mut()
        .ok_or("configuration must be a mapping")?
        .entry(DRIVER_NAME)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or("WN1821 section must be a mapping")?;

    if let Some(url) = &args.url {
        section.insert("url".to_string(), Value::from(url.as_str()));
    }
    if let Some(channels) = &args.outdoor_channels {
        let channels = parse_channel_list(channels).join(",");
        section.insert(
            "out_temp_and_humidity_channels".to_string(),
            Value::from(channels),
        );
    }

    Ok(())
}

fn timestamp_to_string(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(stamp) => format!("{} ({})", stamp.format("%Y-%m-%d %H:%M:%S %Z"), ts),
        None => format!("****** N/A ******* ({})", ts),
    }
}
