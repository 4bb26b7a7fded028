// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Ergon Sandbox
// Demo binary running a simulated patch-download queue on the task pool

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ergon_agents::{BackgroundOp, BeginOp, OpAgent, OpRunner};
use ergon_core::{ReuseAllocator, ReusePool, Reusable, SerialCounter, SerialId, Task, TaskBase};
use ergon_pool::TaskPool;

const TICK: Duration = Duration::from_millis(16);
const CHUNK: usize = 16 * 1024;

/// Progress reporting from download workers to the main loop.
#[derive(Debug, Clone)]
enum DownloadEvent {
    Chunk {
        serial_id: SerialId,
        received: usize,
        total: usize,
    },
    Finished {
        serial_id: SerialId,
        bytes: usize,
    },
    Failed {
        serial_id: SerialId,
    },
}

/// One file to fetch; `user_data` carries the file name.
#[derive(Default)]
struct DownloadTask {
    base: TaskBase<String>,
    bytes: usize,
    received: usize,
}

impl Reusable for DownloadTask {
    fn clear(&mut self) {
        self.base.clear_base();
        self.bytes = 0;
        self.received = 0;
    }
}

impl Task for DownloadTask {
    type UserData = String;

    fn serial_id(&self) -> SerialId {
        self.base.serial_id()
    }

    fn tag(&self) -> Option<&str> {
        self.base.tag()
    }

    fn priority(&self) -> i32 {
        self.base.priority()
    }

    fn user_data(&self) -> Option<&String> {
        self.base.user_data()
    }

    fn done(&self) -> bool {
        self.base.done()
    }

    fn set_done(&mut self, done: bool) {
        self.base.set_done(done);
    }

    fn description(&self) -> Option<String> {
        Some(format!("{}/{} bytes", self.received, self.bytes))
    }
}

/// Runner that moves bytes on a worker thread, one chunk per millisecond.
struct DownloadRunner {
    events: flume::Sender<DownloadEvent>,
}

impl DownloadRunner {
    fn new(events: &flume::Sender<DownloadEvent>) -> Self {
        Self {
            events: events.clone(),
        }
    }
}

impl OpRunner<DownloadTask> for DownloadRunner {
    type Output = usize;

    fn begin(&mut self, task: &mut DownloadTask) -> BeginOp<usize> {
        if task.bytes == 0 {
            // Nothing to stream; settle on the spot.
            let _ = self.events.send(DownloadEvent::Finished {
                serial_id: task.serial_id(),
                bytes: 0,
            });
            return BeginOp::Finished;
        }
        let serial_id = task.serial_id();
        let total = task.bytes;
        let events = self.events.clone();
        BeginOp::Run(BackgroundOp::spawn(move |token| {
            let mut received = 0;
            let mut chunks = 0u32;
            while received < total {
                if token.is_cancelled() {
                    return None;
                }
                received = (received + CHUNK).min(total);
                chunks += 1;
                if chunks % 16 == 0 {
                    let _ = events.send(DownloadEvent::Chunk {
                        serial_id,
                        received,
                        total,
                    });
                }
                std::thread::sleep(Duration::from_millis(1));
            }
            Some(received)
        }))
    }

    fn complete(&mut self, task: &mut DownloadTask, output: usize) {
        task.received = output;
        let _ = self.events.send(DownloadEvent::Finished {
            serial_id: task.serial_id(),
            bytes: output,
        });
    }

    fn fail(&mut self, task: &mut DownloadTask) {
        let _ = self.events.send(DownloadEvent::Failed {
            serial_id: task.serial_id(),
        });
    }
}

fn download(
    allocator: &ReusePool<DownloadTask>,
    serials: &SerialCounter,
    file: &str,
    tag: Option<&str>,
    priority: i32,
    bytes: usize,
) -> DownloadTask {
    let mut task = allocator.acquire();
    task.base.initialize(
        serials.next_id(),
        tag.map(str::to_owned),
        priority,
        Some(file.to_owned()),
    );
    task.bytes = bytes;
    task
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let (events_tx, events_rx) = flume::unbounded();

    let allocator: Arc<ReusePool<DownloadTask>> = Arc::new(ReusePool::new());
    allocator.reserve(8);

    let mut pool = TaskPool::new(allocator.clone() as Arc<dyn ReuseAllocator<DownloadTask>>);
    for _ in 0..3 {
        pool.add_agent(Box::new(OpAgent::new(DownloadRunner::new(&events_tx))));
    }

    let serials = SerialCounter::new();
    let queue = [
        ("patch-001.bin", Some("patch"), 10, 2 * 1024 * 1024),
        ("patch-002.bin", Some("patch"), 10, 3 * 1024 * 1024),
        ("manifest.json", Some("patch"), 10, 0),
        ("intro.ogv", Some("media"), 0, 8 * 1024 * 1024),
        ("menu-theme.ogg", Some("media"), 0, 6 * 1024 * 1024),
    ];
    for (file, tag, priority, bytes) in queue {
        pool.add_task(download(&allocator, &serials, file, tag, priority, bytes))?;
    }
    log::info!("Queued {} downloads", pool.waiting_task_count());

    let mut frame: u32 = 0;
    loop {
        frame += 1;
        std::thread::sleep(TICK);
        pool.update(TICK, TICK);

        for event in events_rx.try_iter() {
            match event {
                DownloadEvent::Chunk {
                    serial_id,
                    received,
                    total,
                } => log::debug!("Download {serial_id}: {received}/{total} bytes"),
                DownloadEvent::Finished { serial_id, bytes } => {
                    log::info!("Download {serial_id} finished ({bytes} bytes)");
                }
                DownloadEvent::Failed { serial_id } => {
                    log::warn!("Download {serial_id} failed");
                }
            }
        }

        match frame {
            6 => {
                pool.set_paused(true);
                log::info!("Paused; everything in flight right now:");
                println!("{}", serde_json::to_string_pretty(&pool.get_all_task_infos())?);
            }
            10 => {
                pool.set_paused(false);
                log::info!("Resumed");
            }
            14 => {
                let dropped = pool.remove_tasks("media");
                log::info!("Dropped {dropped} media downloads to make room for a hotfix");
                pool.add_task(download(
                    &allocator,
                    &serials,
                    "hotfix-003.bin",
                    Some("patch"),
                    50,
                    1024 * 1024,
                ))?;
            }
            _ => {}
        }

        if frame > 16 && pool.get_all_task_infos().is_empty() {
            log::info!("Queue drained after {frame} frames");
            break;
        }
        if frame > 600 {
            anyhow::bail!("downloads did not settle within {frame} frames");
        }
    }

    println!("{}", serde_json::to_string_pretty(&pool.stats())?);
    println!("{}", serde_json::to_string_pretty(&allocator.stats())?);
    pool.shutdown();
    Ok(())
}
