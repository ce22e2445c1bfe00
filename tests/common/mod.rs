#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};

pub const PASSWORD: &str = "secret";

/// Behaviour switches for the mock server.
#[derive(Clone)]
pub struct MockOptions {
    /// Answer `USER` with 230 instead of 331.
    pub login_without_password: bool,
    /// Advertise a PASV endpoint nobody listens on.
    pub dead_passive_port: bool,
    pub greeting_code: u16,
    pub quit_code: u16,
    /// Reply closing a data transfer, sent after the data connection ends.
    pub transfer_final_reply: String,
    /// Reset download connections instead of sending the payload.
    pub reset_data: bool,
    pub listing: String,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            login_without_password: false,
            dead_passive_port: false,
            greeting_code: 220,
            quit_code: 221,
            transfer_final_reply: "226 Transfer complete".to_string(),
            reset_data: false,
            listing: "a\nb\nc\n".to_string(),
        }
    }
}

/// A single-threaded in-memory FTP server for one client at a time.
pub struct MockServer {
    pub address: String,
    pub commands: Arc<Mutex<Vec<String>>>,
    pub files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockServer {
    pub async fn start(options: MockOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let commands = Arc::new(Mutex::new(Vec::new()));
        let files = Arc::new(Mutex::new(HashMap::new()));

        let (log, store) = (commands.clone(), files.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                serve(stream, options.clone(), log.clone(), store.clone()).await;
            }
        });

        Self {
            address,
            commands,
            files,
        }
    }

    pub fn add_file(&self, name: &str, contents: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), contents.to_vec());
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    /// Command lines received so far, without line terminators.
    pub fn received(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn verbs(&self) -> Vec<String> {
        self.received()
            .iter()
            .map(|line| line.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }
}

async fn reply(writer: &mut OwnedWriteHalf, text: &str) {
    let _ = writer.write_all(format!("{}\r\n", text).as_bytes()).await;
}

async fn accept_data(passive: &mut Option<TcpListener>) -> Option<TcpStream> {
    let listener = passive.take()?;
    listener.accept().await.ok().map(|(stream, _)| stream)
}

/// Sends `payload` on the next data connection, or resets it.
async fn send_data(passive: &mut Option<TcpListener>, payload: &[u8], reset: bool) {
    let Some(mut data) = accept_data(passive).await else {
        return;
    };
    if reset {
        #[allow(deprecated)]
        let _ = data.set_linger(Some(Duration::ZERO));
        drop(data);
    } else {
        let _ = data.write_all(payload).await;
        let _ = data.shutdown().await;
    }
}

async fn serve(
    stream: TcpStream,
    options: MockOptions,
    log: Arc<Mutex<Vec<String>>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut passive: Option<TcpListener> = None;

    reply(&mut writer, &format!("{} Mock FTP ready", options.greeting_code)).await;

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim_end_matches('\r').to_string();
        log.lock().unwrap().push(line.clone());
        let (verb, arg) = match line.split_once(' ') {
            Some((verb, arg)) => (verb.to_string(), arg.to_string()),
            None => (line.clone(), String::new()),
        };

        match verb.as_str() {
            "USER" if options.login_without_password => {
                reply(&mut writer, "230 Anonymous access granted").await
            }
            "USER" => reply(&mut writer, "331 Password required").await,
            "PASS" if arg == PASSWORD => reply(&mut writer, "230 Login successful").await,
            "PASS" => reply(&mut writer, "530 Login incorrect").await,
            "TYPE" => reply(&mut writer, &format!("200 Type set to {}", arg)).await,
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                let port = listener.local_addr().unwrap().port();
                if options.dead_passive_port {
                    drop(listener);
                } else {
                    passive = Some(listener);
                }
                let text = format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{}).",
                    port >> 8,
                    port & 0xff
                );
                reply(&mut writer, &text).await;
            }
            "LIST" => {
                reply(&mut writer, "150 Here comes the directory listing").await;
                send_data(&mut passive, options.listing.as_bytes(), options.reset_data).await;
                reply(&mut writer, &options.transfer_final_reply).await;
            }
            "RETR" => {
                let contents = files.lock().unwrap().get(&arg).cloned();
                match contents {
                    Some(contents) => {
                        reply(&mut writer, "150 Opening BINARY mode data connection").await;
                        send_data(&mut passive, &contents, options.reset_data).await;
                        reply(&mut writer, &options.transfer_final_reply).await;
                    }
                    None => {
                        passive = None;
                        reply(&mut writer, "550 Failed to open file").await;
                    }
                }
            }
            "STOR" => {
                reply(&mut writer, "150 Ok to send data").await;
                let mut contents = Vec::new();
                if let Some(mut data) = accept_data(&mut passive).await {
                    let _ = data.read_to_end(&mut contents).await;
                }
                files.lock().unwrap().insert(arg, contents);
                reply(&mut writer, &options.transfer_final_reply).await;
            }
            "DELE" => {
                let removed = files.lock().unwrap().remove(&arg).is_some();
                if removed {
                    reply(&mut writer, "250 Delete operation successful").await;
                } else {
                    reply(&mut writer, "550 Delete operation failed").await;
                }
            }
            "MKD" => reply(&mut writer, &format!("257 \"/{}\" created", arg)).await,
            "RMD" => reply(&mut writer, "250 Remove directory operation successful").await,
            "PWD" => reply(&mut writer, "257 \"/\" is the current directory").await,
            "CWD" => reply(&mut writer, "250 Directory successfully changed").await,
            "HELP" => {
                reply(&mut writer, "214-The following commands are recognized.").await;
                reply(&mut writer, " USER PASS LIST RETR STOR").await;
                reply(&mut writer, "214 Help OK.").await;
            }
            "STAT" => reply(&mut writer, "211 Mock FTP status OK").await,
            "QUIT" => {
                reply(&mut writer, &format!("{} Goodbye", options.quit_code)).await;
                break;
            }
            _ => reply(&mut writer, "502 Command not implemented").await,
        }
    }
}
