use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "minichain")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "createblockchain",
        about = "Create a new blockchain and the genesis block"
    )]
    Createblockchain {
        #[arg(long, help = "The address to send the genesis block reward to")]
        address: String,
    },
    #[command(name = "getbalance", about = "Get the balance of an address")]
    GetBalance {
        #[arg(long, help = "The address to check the balance of")]
        address: String,
    },
    #[command(name = "send", about = "Send an amount from one address to another")]
    Send {
        #[arg(long, help = "Source address")]
        from: String,
        #[arg(long, help = "Destination address")]
        to: String,
        #[arg(long, help = "Amount to send")]
        amount: u64,
    },
    #[command(
        name = "mine",
        about = "Mine a new block and receive the mining reward"
    )]
    Mine {
        #[arg(long, help = "The address to receive the mining reward")]
        address: String,
    },
    #[command(name = "printchain", about = "Print all blocks in the blockchain")]
    Printchain,
    #[command(
        name = "interactive",
        about = "Start interactive mode for continuous command execution"
    )]
    Interactive,
}
