//! Command Dispatch
//!
//! Maps a command name to its handler and applies it to the parsed
//! arguments, the shared store, and the read-only configuration.
//!
//! Handlers are registered explicitly in [`CommandTable::new`], once, so
//! the set of commands is checkable at compile time with no runtime
//! scanning of method names. A handler reports every validation failure
//! as a [`Reply::Error`]; nothing here panics on client input.
//!
//! ## Supported commands
//!
//! - `PING` - liveness check
//! - `ECHO message` - returns the message as a bulk string
//! - `SET key value [PX milliseconds]` - store a key, optionally with TTL
//! - `GET key` - fetch a key (nil if absent or expired)
//! - `CONFIG GET parameter` - read a startup configuration value

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::protocol::Reply;
use crate::storage::KvStore;

/// A command handler: dispatcher state plus the arguments after the name.
type HandlerFn = fn(&CommandTable, &[Bytes]) -> Reply;

/// The command dispatch table.
///
/// Owns references to the shared store and configuration; execution is a
/// pure function of those and the incoming arguments.
pub struct CommandTable {
    store: Arc<KvStore>,
    config: Arc<ServerConfig>,
    handlers: HashMap<&'static str, HandlerFn>,
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTable")
            .field("commands", &self.handlers.len())
            .finish()
    }
}

impl CommandTable {
    /// Builds the table, registering every handler by lower-case name.
    pub fn new(store: Arc<KvStore>, config: Arc<ServerConfig>) -> Self {
        let mut handlers: HashMap<&'static str, HandlerFn> = HashMap::new();
        handlers.insert("ping", Self::cmd_ping);
        handlers.insert("echo", Self::cmd_echo);
        handlers.insert("set", Self::cmd_set);
        handlers.insert("get", Self::cmd_get);
        handlers.insert("config", Self::cmd_config);

        Self {
            store,
            config,
            handlers,
        }
    }

    /// Executes one decoded command.
    ///
    /// `args[0]` is the command name (matched case-insensitively), the
    /// rest are its operands.
    pub fn execute(&self, args: &[Bytes]) -> Reply {
        let Some(name) = args.first() else {
            return Reply::error("ERR empty command");
        };

        let name = match std::str::from_utf8(name) {
            Ok(s) => s.to_lowercase(),
            Err(_) => return Reply::error("ERR unknown command"),
        };

        match self.handlers.get(name.as_str()) {
            Some(handler) => handler(self, &args[1..]),
            None => Reply::error("ERR unknown command"),
        }
    }

    /// Extracts a UTF-8 view of one argument.
    fn arg_str(args: &[Bytes], index: usize) -> Option<&str> {
        args.get(index).and_then(|a| std::str::from_utf8(a).ok())
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// PING
    fn cmd_ping(&self, _args: &[Bytes]) -> Reply {
        Reply::pong()
    }

    /// ECHO message
    fn cmd_echo(&self, args: &[Bytes]) -> Reply {
        match args.first() {
            Some(msg) => Reply::bulk(msg.clone()),
            None => Reply::error("ERR wrong number of arguments for 'ECHO' command"),
        }
    }

    /// SET key value [PX milliseconds]
    fn cmd_set(&self, args: &[Bytes]) -> Reply {
        if args.len() < 2 {
            return Reply::error("ERR wrong number of arguments for 'SET' command");
        }

        let mut expire_after_ms = None;
        if args.len() > 2 {
            if args.len() > 4 {
                return Reply::error("ERR syntax error");
            }

            let is_px = Self::arg_str(args, 2)
                .map(|opt| opt.eq_ignore_ascii_case("px"))
                .unwrap_or(false);
            if !is_px {
                return Reply::error("ERR syntax error");
            }

            expire_after_ms = match Self::arg_str(args, 3).and_then(|ms| ms.parse::<u64>().ok()) {
                Some(ms) => Some(ms),
                None => return Reply::error("PX requires a valid integer"),
            };
        }

        self.store
            .set(args[0].clone(), args[1].clone(), expire_after_ms);
        Reply::ok()
    }

    /// GET key
    fn cmd_get(&self, args: &[Bytes]) -> Reply {
        match args.first() {
            Some(key) => match self.store.get(key) {
                Some(value) => Reply::bulk(value),
                None => Reply::nil(),
            },
            None => Reply::error("ERR wrong number of arguments for 'GET' command"),
        }
    }

    /// CONFIG GET parameter
    fn cmd_config(&self, args: &[Bytes]) -> Reply {
        let is_get = args.len() == 2
            && Self::arg_str(args, 0)
                .map(|sub| sub.eq_ignore_ascii_case("get"))
                .unwrap_or(false);
        if !is_get {
            return Reply::error("ERR wrong number of arguments for 'CONFIG' command");
        }

        let Some(param) = Self::arg_str(args, 1) else {
            return Reply::array(vec![]);
        };

        match self.config.get_param(param) {
            Some(value) => Reply::array(vec![
                Reply::bulk(args[1].clone()),
                Reply::bulk(Bytes::copy_from_slice(value.as_bytes())),
            ]),
            None => Reply::array(vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ManualClock;

    fn table() -> (CommandTable, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let store = Arc::new(KvStore::with_clock(clock.clone()));
        let config = Arc::new(ServerConfig::default());
        (CommandTable::new(store, config), clock)
    }

    fn table_with_store() -> (CommandTable, Arc<KvStore>) {
        let store = Arc::new(KvStore::new());
        let config = Arc::new(ServerConfig::default());
        (CommandTable::new(Arc::clone(&store), config), store)
    }

    fn cmd(parts: &[&str]) -> Vec<Bytes> {
        parts
            .iter()
            .map(|s| Bytes::copy_from_slice(s.as_bytes()))
            .collect()
    }

    #[test]
    fn test_ping() {
        let (table, _) = table();
        assert_eq!(table.execute(&cmd(&["PING"])), Reply::pong());
    }

    #[test]
    fn test_command_names_are_case_insensitive() {
        let (table, _) = table();
        assert_eq!(table.execute(&cmd(&["ping"])), Reply::pong());
        assert_eq!(table.execute(&cmd(&["PiNg"])), Reply::pong());
    }

    #[test]
    fn test_echo() {
        let (table, _) = table();
        let reply = table.execute(&cmd(&["ECHO", "hello"]));
        assert_eq!(reply, Reply::bulk(Bytes::from("hello")));
    }

    #[test]
    fn test_echo_missing_argument() {
        let (table, _) = table();
        assert!(table.execute(&cmd(&["ECHO"])).is_error());
    }

    #[test]
    fn test_set_then_get() {
        let (table, _) = table();
        assert_eq!(table.execute(&cmd(&["SET", "k", "v"])), Reply::ok());
        assert_eq!(
            table.execute(&cmd(&["GET", "k"])),
            Reply::bulk(Bytes::from("v"))
        );
    }

    #[test]
    fn test_set_arity_error() {
        let (table, _) = table();
        assert!(table.execute(&cmd(&["SET", "k"])).is_error());
        assert!(table.execute(&cmd(&["SET"])).is_error());
    }

    #[test]
    fn test_get_absent_key_is_nil() {
        let (table, _) = table();
        assert_eq!(table.execute(&cmd(&["GET", "missing"])), Reply::nil());
    }

    #[test]
    fn test_get_arity_error() {
        let (table, _) = table();
        assert!(table.execute(&cmd(&["GET"])).is_error());
    }

    #[test]
    fn test_set_with_px_expires() {
        let (table, clock) = table();
        assert_eq!(table.execute(&cmd(&["SET", "k", "v", "PX", "100"])), Reply::ok());

        clock.advance(50);
        assert_eq!(
            table.execute(&cmd(&["GET", "k"])),
            Reply::bulk(Bytes::from("v"))
        );

        clock.advance(100);
        assert_eq!(table.execute(&cmd(&["GET", "k"])), Reply::nil());
    }

    #[test]
    fn test_set_with_px_zero_expires_immediately() {
        let (table, _) = table();
        assert_eq!(table.execute(&cmd(&["SET", "k", "v", "PX", "0"])), Reply::ok());
        assert_eq!(table.execute(&cmd(&["GET", "k"])), Reply::nil());
    }

    #[test]
    fn test_set_px_option_is_case_insensitive() {
        let (table, clock) = table();
        assert_eq!(table.execute(&cmd(&["SET", "k", "v", "px", "50"])), Reply::ok());
        clock.advance(60);
        assert_eq!(table.execute(&cmd(&["GET", "k"])), Reply::nil());
    }

    #[test]
    fn test_set_px_requires_integer() {
        let (table, _) = table();
        assert_eq!(
            table.execute(&cmd(&["SET", "k", "v", "PX", "soon"])),
            Reply::error("PX requires a valid integer")
        );
        assert_eq!(
            table.execute(&cmd(&["SET", "k", "v", "PX"])),
            Reply::error("PX requires a valid integer")
        );
    }

    #[test]
    fn test_set_unknown_option() {
        let (table, _) = table();
        assert!(table.execute(&cmd(&["SET", "k", "v", "EX", "10"])).is_error());
    }

    #[test]
    fn test_set_trailing_arguments_rejected() {
        let (table, _) = table();
        assert_eq!(
            table.execute(&cmd(&["SET", "k", "v", "PX", "100", "junk"])),
            Reply::error("ERR syntax error")
        );
        // The rejected command must not have touched the store.
        assert_eq!(table.execute(&cmd(&["GET", "k"])), Reply::nil());
    }

    #[test]
    fn test_set_with_maximum_px_never_expires_early() {
        let (table, clock) = table();
        let max = u64::MAX.to_string();
        assert_eq!(
            table.execute(&cmd(&["SET", "k", "v", "PX", max.as_str()])),
            Reply::ok()
        );

        clock.advance(1_000_000);
        assert_eq!(
            table.execute(&cmd(&["GET", "k"])),
            Reply::bulk(Bytes::from("v"))
        );
    }

    #[test]
    fn test_config_get_known_param() {
        let (table, _) = table();
        let reply = table.execute(&cmd(&["CONFIG", "GET", "dir"]));
        assert_eq!(
            reply,
            Reply::array(vec![
                Reply::bulk(Bytes::from("dir")),
                Reply::bulk(Bytes::from("/tmp")),
            ])
        );
    }

    #[test]
    fn test_config_get_is_case_insensitive() {
        let (table, _) = table();
        let reply = table.execute(&cmd(&["config", "get", "DBFILENAME"]));
        assert_eq!(
            reply,
            Reply::array(vec![
                Reply::bulk(Bytes::from("DBFILENAME")),
                Reply::bulk(Bytes::from("dump.rdb")),
            ])
        );
    }

    #[test]
    fn test_config_get_unknown_param_is_empty_array() {
        let (table, _) = table();
        assert_eq!(
            table.execute(&cmd(&["CONFIG", "GET", "maxmemory"])),
            Reply::array(vec![])
        );
    }

    #[test]
    fn test_config_bad_shape_is_error() {
        let (table, _) = table();
        assert!(table.execute(&cmd(&["CONFIG"])).is_error());
        assert!(table.execute(&cmd(&["CONFIG", "SET", "dir"])).is_error());
        assert!(table.execute(&cmd(&["CONFIG", "GET", "dir", "extra"])).is_error());
    }

    #[test]
    fn test_unknown_command() {
        let (table, _) = table();
        assert_eq!(
            table.execute(&cmd(&["FOO"])),
            Reply::error("ERR unknown command")
        );
    }

    #[test]
    fn test_unknown_command_leaves_store_unmodified() {
        let (table, store) = table_with_store();
        table.execute(&cmd(&["SET", "k", "v"]));
        assert_eq!(store.len(), 1);

        let reply = table.execute(&cmd(&["FOO", "bar", "baz"]));
        assert!(reply.is_error());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&Bytes::from("k")), Some(Bytes::from("v")));
    }

    #[test]
    fn test_empty_command() {
        let (table, _) = table();
        assert_eq!(table.execute(&[]), Reply::error("ERR empty command"));
    }

    #[test]
    fn test_repeated_set_overwrites() {
        let (table, store) = table_with_store();
        for _ in 0..5 {
            table.execute(&cmd(&["SET", "k", "v"]));
        }
        assert_eq!(store.len(), 1);
    }
}
