use counter_forge::counter::SCHEMA;

use crate::{cli::SchemaArgs, error::Result};

pub fn run(args: SchemaArgs) -> Result<()> {
    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&SCHEMA)?);
    } else {
        println!("{}", serde_json::to_string(&SCHEMA)?);
    }

    Ok(())
}
