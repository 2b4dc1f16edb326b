// CLI entry point for the ledger. Every command opens the chain store,
// runs end-to-end, and drops the handle before the process exits, so the
// store's file lock is released on every path.
use clap::Parser;
use data_encoding::HEXLOWER;
use log::{error, LevelFilter};
use minichain::{
    Blockchain, BlockchainError, Command, Opt, ProofOfWork, Result, Transaction, SUBSIDY,
};
use std::io::{self, Write};
use std::process;

const MINING_REWARD_NOTE: &str = "Mining reward";

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<()> {
    match command {
        Command::Createblockchain { address } => create_blockchain(&address),
        Command::GetBalance { address } => get_balance(&address),
        Command::Send { from, to, amount } => {
            if amount == 0 {
                return Err(BlockchainError::InvalidArguments(
                    "amount must be greater than 0".to_string(),
                ));
            }
            send(&from, &to, amount)
        }
        Command::Mine { address } => mine(&address),
        Command::Printchain => print_chain(),
        Command::Interactive => interactive_mode(),
    }
}

fn create_blockchain(address: &str) -> Result<()> {
    let _blockchain = Blockchain::create_blockchain(address)?;
    println!("Blockchain created successfully!");
    Ok(())
}

fn get_balance(address: &str) -> Result<()> {
    let blockchain = Blockchain::new_blockchain()?;

    let mut balance = 0;
    for utxo in blockchain.find_utxo(address) {
        balance += utxo.get_value();
    }
    println!("Balance of {address}: {balance}");
    Ok(())
}

fn send(from: &str, to: &str, amount: u64) -> Result<()> {
    let blockchain = Blockchain::new_blockchain()?;

    let tx = Transaction::new_utxo_transaction(from, to, amount, &blockchain)?;
    blockchain.mine_block(&[tx])?;
    println!("Transaction sent from {from} to {to} for amount {amount} successfully");
    Ok(())
}

fn mine(address: &str) -> Result<()> {
    let blockchain = Blockchain::new_blockchain()?;

    let tx = Transaction::new_coinbase_tx(address, MINING_REWARD_NOTE)?;
    blockchain.mine_block(&[tx])?;
    println!("Block mined successfully! Mining reward of {SUBSIDY} coins sent to {address}");
    Ok(())
}

fn print_chain() -> Result<()> {
    let blockchain = Blockchain::new_blockchain()?;

    let mut iterator = blockchain.iterator();
    while let Some(block) = iterator.next() {
        println!("Previous Hash: {}", HEXLOWER.encode(&block.get_pre_block_hash()));
        println!("Block Hash: {}", HEXLOWER.encode(block.get_hash()));
        println!("PoW: {}", ProofOfWork::validate(&block));
        for tx in block.get_transactions() {
            println!("- Transaction: {}", HEXLOWER.encode(tx.get_id()));
        }
        println!();
    }
    Ok(())
}

fn interactive_mode() -> Result<()> {
    println!("=== Blockchain Interactive Mode ===");
    println!("Type 'help' for available commands, 'exit' or 'quit' to leave");
    println!();

    loop {
        print!("blockchain> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let args: Vec<&str> = input.split_whitespace().collect();
        let result = match args[0] {
            "exit" | "quit" => {
                println!("Exiting interactive mode...");
                return Ok(());
            }
            "help" => {
                print_interactive_help();
                Ok(())
            }
            "getbalance" => {
                if args.len() != 2 {
                    println!("Usage: getbalance <address>");
                    continue;
                }
                get_balance(args[1])
            }
            "createblockchain" => {
                if args.len() != 2 {
                    println!("Usage: createblockchain <address>");
                    continue;
                }
                create_blockchain(args[1])
            }
            "printchain" => print_chain(),
            "send" => {
                if args.len() != 4 {
                    println!("Usage: send <from> <to> <amount>");
                    continue;
                }
                match args[3].parse::<u64>() {
                    Ok(amount) if amount > 0 => send(args[1], args[2], amount),
                    _ => {
                        println!("Error: amount must be a number greater than 0");
                        continue;
                    }
                }
            }
            "mine" => {
                if args.len() != 2 {
                    println!("Usage: mine <address>");
                    continue;
                }
                mine(args[1])
            }
            unknown => {
                println!("Unknown command: {unknown}");
                println!("Type 'help' for available commands");
                Ok(())
            }
        };

        // A failed command is reported but never ends the session
        if let Err(e) = result {
            println!("Error: {e}");
        }
        println!();
    }
    Ok(())
}

fn print_interactive_help() {
    println!("Available commands:");
    println!("  getbalance <address>          - Get balance of an address");
    println!("  createblockchain <address>    - Create a new blockchain and genesis block");
    println!("  send <from> <to> <amount>     - Send amount from one address to another");
    println!("  mine <address>                - Mine a new block and receive mining reward");
    println!("  printchain                    - Print all blocks in the blockchain");
    println!("  help                          - Show this help message");
    println!("  exit, quit                    - Exit interactive mode");
}
