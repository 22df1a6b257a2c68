//! Self-play statistics tracking.

use std::time::Instant;

use blokus_core::Player;
use log::info;

use crate::game::GameRecord;

/// Get current process memory usage in bytes (RSS - Resident Set Size).
/// Returns None if unable to determine.
#[cfg(target_os = "macos")]
pub fn get_memory_usage() -> Option<u64> {
    use std::mem::MaybeUninit;

    // macOS: use mach APIs
    extern "C" {
        fn mach_task_self() -> u32;
        fn task_info(
            target_task: u32,
            flavor: i32,
            task_info_out: *mut libc::c_void,
            task_info_out_cnt: *mut u32,
        ) -> i32;
    }

    #[repr(C)]
    struct TaskBasicInfo {
        suspend_count: i32,
        virtual_size: u64,
        resident_size: u64,
        user_time: (i32, i32),
        system_time: (i32, i32),
        policy: i32,
    }

    const TASK_BASIC_INFO_64: i32 = 5;
    const TASK_BASIC_INFO_64_COUNT: u32 = 10;

    unsafe {
        let mut info = MaybeUninit::<TaskBasicInfo>::uninit();
        let mut count = TASK_BASIC_INFO_64_COUNT;

        let result = task_info(
            mach_task_self(),
            TASK_BASIC_INFO_64,
            info.as_mut_ptr() as *mut libc::c_void,
            &mut count,
        );

        if result == 0 {
            Some(info.assume_init().resident_size)
        } else {
            None
        }
    }
}

#[cfg(target_os = "linux")]
pub fn get_memory_usage() -> Option<u64> {
    // Linux: read from /proc/self/status
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn get_memory_usage() -> Option<u64> {
    None
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Totals over all games of a run.
#[derive(Debug, Default)]
pub struct SimStats {
    pub games: u64,
    pub moves: u64,
    pub passes: u64,
    pub interrupted: u64,

    /// Shortest and longest game, in moves
    pub min_moves: Option<usize>,
    pub max_moves: usize,

    /// Per player
    pub pieces: [u64; Player::COUNT],
    pub cells: [u64; Player::COUNT],

    /// For rate calculation
    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
    last_log_moves: u64,
}

impl SimStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Fold one finished game into the totals
    pub fn record_game(&mut self, record: &GameRecord) {
        let moves = record.turns.len();
        self.games += 1;
        self.moves += moves as u64;
        self.passes += record.passes as u64;
        if record.interrupted {
            self.interrupted += 1;
        }
        self.min_moves = Some(self.min_moves.map_or(moves, |m| m.min(moves)));
        self.max_moves = self.max_moves.max(moves);
        for player in Player::all() {
            self.pieces[player.index()] += record.placed[player.index()] as u64;
            self.cells[player.index()] += record.cells[player.index()] as u64;
        }
    }

    /// Get current moves per second
    pub fn moves_per_sec(&self) -> f64 {
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                return self.moves as f64 / elapsed;
            }
        }
        0.0
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        if let Some(last) = self.last_log_time {
            last.elapsed().as_secs() >= interval_secs
        } else {
            true
        }
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self, total_games: usize) {
        let now = Instant::now();
        let elapsed_total = self.start_time.map(|s| s.elapsed().as_secs()).unwrap_or(0);

        // Calculate rate since last log
        let rate = if let Some(last) = self.last_log_time {
            let elapsed = last.elapsed().as_secs_f64();
            let moves = self.moves - self.last_log_moves;
            if elapsed > 0.0 {
                moves as f64 / elapsed
            } else {
                0.0
            }
        } else {
            self.moves_per_sec()
        };

        let mem_str = get_memory_usage()
            .map(|m| format!(" mem={}", format_bytes(m)))
            .unwrap_or_default();

        info!(
            "[{:02}:{:02}:{:02}] games={}/{} moves={} passes={} rate={:.0}/s{}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            self.games,
            total_games,
            self.moves,
            self.passes,
            rate,
            mem_str,
        );

        self.last_log_time = Some(now);
        self.last_log_moves = self.moves;
    }

    /// Average cells covered per game, per player
    pub fn average_cells(&self) -> [f64; Player::COUNT] {
        let games = self.games.max(1) as f64;
        std::array::from_fn(|i| self.cells[i] as f64 / games)
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Games played: {}", self.games);
        if self.interrupted > 0 {
            println!("  - Interrupted: {}", self.interrupted);
        }
        println!("Moves: {}", self.moves);
        println!("Passes: {}", self.passes);
        println!(
            "Game length: min={} max={}",
            self.min_moves.unwrap_or(0),
            self.max_moves
        );
        let averages = self.average_cells();
        for player in Player::all() {
            println!(
                "  - Player {}: {} pieces, {} cells ({:.1} cells/game)",
                player.digit(),
                self.pieces[player.index()],
                self.cells[player.index()],
                averages[player.index()],
            );
        }

        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            println!("Average rate: {:.0} moves/sec", self.moves as f64 / elapsed);
        }
        if let Some(mem) = get_memory_usage() {
            println!("Memory: {}", format_bytes(mem));
        }
    }
}
