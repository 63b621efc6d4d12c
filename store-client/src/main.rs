use std::process::ExitCode;

use solana_client::rpc_client::RpcClient;
use solana_config_store::instruction::{self, ConfigAccount, StoreBuilder};
use solana_config_store::state::{ConfigAccountData, ConfigKeys};
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::signature::Signer;
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::transaction::Transaction;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::UiTransactionEncoding;


/// RPC node used unless `SOLANA_RPC_URL` is set.
const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";


type Result<T = (), E = Error> = core::result::Result<T, E>;


/// `usage: config-store-cli <data>`
///
/// Creates a new config account with a freshly generated required signer and
/// stores `<data>` in it.
fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("{err}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}


/// Executes the program.
fn run() -> Result {
    let data = parse_args()?;
    let payer = read_keypair()?;
    let url = std::env::var("SOLANA_RPC_URL")
        .unwrap_or_else(|_| DEFAULT_RPC_URL.into());
    let client = RpcClient::new(url);

    let config = Keypair::new();
    let signer = Keypair::new();
    let keys = ConfigKeys(vec![(signer.pubkey(), true)]);

    eprintln!("Creating config account {}…", config.pubkey());
    let space = keys.encoded_len()? + data.len();
    let lamports = client.get_minimum_balance_for_rent_exemption(space)?;
    let mut instructions = instruction::create_account_with_max_config_space(
        &payer.pubkey(),
        &config.pubkey(),
        lamports,
        data.len() as u64,
        &keys,
    )?;

    // First store must be signed by the config account as well as by every
    // key recorded as a signer.
    instructions.push(
        StoreBuilder::new()
            .config_account(ConfigAccount::Signer(config.pubkey()))
            .keys(keys.clone())
            .data(data)
            .signer(signer.pubkey())
            .build()?,
    );
    send_and_confirm(&client, &instructions, &[&payer, &config, &signer])?;

    eprintln!();
    eprintln!("Reading config account…");
    let account = client.get_account_data(&config.pubkey())?;
    let account = ConfigAccountData::decode(&account)?;
    println!("keys: {}", account.keys.len());
    for (key, is_signer) in account.keys.0.iter() {
        let kind = if *is_signer { "signer" } else { "key" };
        println!("{kind}: {key}");
    }
    println!("data: {}", String::from_utf8_lossy(account.data));
    Ok(())
}


/// Parses the command line arguments and returns data to store.
fn parse_args() -> Result<Vec<u8>> {
    let data = std::env::args().nth(1).ok_or(Error::Usage)?;
    Ok(data.into_bytes())
}


/// Reads keypair from a hard-coded location.
fn read_keypair() -> Result<Keypair> {
    let home = std::env::var_os("HOME").ok_or(Error::Msg("HOME not set"))?;
    let mut path = std::path::PathBuf::from(home);
    path.push(".config/solana/id.json");
    solana_sdk::signer::keypair::read_keypair_file(path)
        .map_err(Error::from)
}


/// Sends a transaction and logs result.
fn send_and_confirm(
    client: &RpcClient,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result {
    let payer = signers.first().ok_or(Error::Msg("No payer"))?;
    let blockhash = client.get_latest_blockhash()?;
    eprintln!("Latest blockhash: {blockhash}");

    for instruction in instructions {
        eprintln!("Calling {}…", instruction.program_id);
    }

    let message = Message::new_with_blockhash(
        instructions,
        Some(&payer.pubkey()),
        &blockhash,
    );
    let mut tx = Transaction::new_unsigned(message);
    tx.try_sign(signers, blockhash)?;

    let sig = client.send_and_confirm_transaction(&tx)?;
    eprintln!("Signature: {sig}");

    let encoding = UiTransactionEncoding::Binary;
    let resp = client.get_transaction(&sig, encoding)?;
    let (slot, tx) = (resp.slot, resp.transaction);
    eprintln!("Executed in slot: {slot}");

    // Print log messages
    let log_messages = tx
        .meta
        .map(|meta| meta.log_messages)
        .ok_or(Error::Msg("No transaction metadata"))?;
    if let OptionSerializer::Some(messages) = log_messages {
        for msg in messages {
            eprintln!("{msg}");
        }
        Ok(())
    } else {
        Err(Error::Msg("No log message"))
    }
}


#[derive(derive_more::From, derive_more::Display)]
enum Error {
    #[display("usage: config-store-cli <data>")]
    #[from(ignore)]
    Usage,
    Msg(&'static str),
    Client(solana_client::client_error::ClientError),
    Signer(solana_sdk::signer::SignerError),
    Store(solana_config_store::Error),
    Box(Box<dyn std::error::Error>),
}
