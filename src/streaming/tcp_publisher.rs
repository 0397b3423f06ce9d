//! Sensor data publisher using TCP sockets
//!
//! A dedicated publisher thread owns the TCP listener. The simulation
//! thread pushes sensor groups through a bounded channel and never touches
//! the network; if the publisher falls behind, ticks are dropped at the
//! channel rather than blocking the simulation.
//!
//! Every group received from the channel produces two frames:
//!
//! | Topic | Payload |
//! |-------|---------|
//! | `sensor_status` | the full sensor record |
//! | `battery_state` | the external battery-state contract |
//!
//! Frames are broadcast to all connected clients; clients that error on
//! write are pruned.

use crate::core::types::StreamReceiver;
use crate::error::Result;
use crate::streaming::messages::BatteryStateMessage;
use crate::streaming::wire::Serializer;
use crossbeam_channel::RecvTimeoutError;
use log::{debug, info, warn};
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Topic for the full sensor record
const TOPIC_SENSOR_STATUS: &str = "sensor_status";
/// Topic for the external battery-state contract
const TOPIC_BATTERY_STATE: &str = "battery_state";

/// Maximum groups drained per loop iteration, so connection handling is
/// never starved by a fast producer
const DRAIN_BATCH: usize = 50;

/// Publisher that streams sensor groups to connected TCP clients
pub struct TcpPublisher {
    local_addr: SocketAddr,
    publisher_thread: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl TcpPublisher {
    /// Bind the listener and start the publisher thread
    pub fn new(bind_address: &str, serializer: Serializer, stream_rx: StreamReceiver) -> Result<Self> {
        let listener = TcpListener::bind(bind_address)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let publisher_thread = thread::Builder::new()
            .name("tcp-publisher".to_string())
            .spawn(move || {
                publisher_loop(listener, serializer, stream_rx, shutdown_clone);
            })?;

        info!("TCP publisher listening on {}", local_addr);

        Ok(Self {
            local_addr,
            publisher_thread: Some(publisher_thread),
            shutdown,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Request the publisher thread to stop
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for TcpPublisher {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.publisher_thread.take() {
            let _ = handle.join();
        }
    }
}

/// Publisher thread main loop
fn publisher_loop(
    listener: TcpListener,
    serializer: Serializer,
    stream_rx: StreamReceiver,
    shutdown: Arc<AtomicBool>,
) {
    let mut clients: Vec<TcpStream> = Vec::new();
    let mut frame_buffer = Vec::with_capacity(1024);
    let mut published: u64 = 0;

    while !shutdown.load(Ordering::Relaxed) {
        // Accept new client connections (non-blocking)
        match listener.accept() {
            Ok((stream, addr)) => {
                info!("Client connected: {}", addr);
                clients.push(stream);
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(e) => warn!("Error accepting client connection: {}", e),
        }

        // Wait briefly for the next group, then drain whatever queued up
        let first = match stream_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(group) => group,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Stream channel disconnected");
                break;
            }
        };

        let mut batch = vec![first];
        while batch.len() < DRAIN_BATCH {
            match stream_rx.try_recv() {
                Ok(group) => batch.push(group),
                Err(_) => break,
            }
        }

        for group in batch {
            match serializer.serialize(&group) {
                Ok(payload) => {
                    broadcast(&mut clients, TOPIC_SENSOR_STATUS, &payload, &mut frame_buffer);
                }
                Err(e) => warn!("Failed to serialize {}: {}", group.group_id, e),
            }

            match BatteryStateMessage::from_group(&group) {
                Some(msg) => match serializer.serialize(&msg) {
                    Ok(payload) => {
                        broadcast(&mut clients, TOPIC_BATTERY_STATE, &payload, &mut frame_buffer);
                    }
                    Err(e) => warn!("Failed to serialize battery state: {}", e),
                },
                None => debug!("Group {} carries no battery fields", group.group_id),
            }

            published += 1;
        }
    }

    info!("TCP publisher exiting ({} groups published)", published);
}

/// Broadcast one frame to all connected clients, pruning dead ones
///
/// Frame format: `[4-byte length (big-endian)][topic][NUL][payload]`
fn broadcast(clients: &mut Vec<TcpStream>, topic: &str, payload: &[u8], buffer: &mut Vec<u8>) {
    let frame_length = (topic.len() + 1 + payload.len()) as u32;

    buffer.clear();
    buffer.reserve(4 + frame_length as usize);
    buffer.extend_from_slice(&frame_length.to_be_bytes());
    buffer.extend_from_slice(topic.as_bytes());
    buffer.push(0);
    buffer.extend_from_slice(payload);

    clients.retain_mut(|client| match client.write_all(buffer) {
        Ok(_) => true,
        Err(e) => {
            if let Ok(addr) = client.peer_addr() {
                debug!("Client {} disconnected: {}", addr, e);
            }
            false
        }
    });
}
