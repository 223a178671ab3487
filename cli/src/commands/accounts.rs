use crate::{cli::ChainOptions, commands::run::load_session, error::Result, ui};

pub fn run(args: ChainOptions) -> Result<()> {
    ui::init_tracing(args.verbose);
    let session = load_session(&args)?;

    ui::status(format!(
        "Chain {} with {} accounts",
        session.chain_id(),
        session.accounts().len()
    ));
    for (index, account) in session.accounts().iter().enumerate() {
        println!("{index:>3}  {account}");
    }

    Ok(())
}
