//! Persistent band workers.
//!
//! Each worker owns one horizontal band of the image for the lifetime of the
//! pool. A frame is dispatched by handing every worker its band buffer over a
//! capacity-1 channel; the worker renders into the buffer and sends it back,
//! and the pool copies the rows into the caller's framebuffer. Sending `None`
//! tells a worker to exit.

use std::mem;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::band::{partition_rows, render_band, Band};
use crate::integrator::Frame;
use crate::{Framebuffer, RenderError, RenderResult};

/// How often a waiting pool checks for workers that died mid-frame.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct Job {
    frame: Arc<Frame>,
    band: Band,
    pixels: Vec<u32>,
}

struct BandResult {
    worker: usize,
    pixels: Vec<u32>,
    result: RenderResult<()>,
}

struct Worker {
    band: Band,
    /// Band buffer while the worker is idle; empty while it is rendering
    pixels: Vec<u32>,
    jobs: Option<SyncSender<Option<Job>>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn is_dead(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

/// A fixed set of render threads reused across frames.
pub struct RenderPool {
    width: u32,
    height: u32,
    workers: Vec<Worker>,
    results: Receiver<BandResult>,
    frames_rendered: u64,
}

impl RenderPool {
    /// Start `threads` workers for a `width` x `height` image.
    ///
    /// The thread count is capped at the number of rows so no band is empty.
    pub fn new(width: u32, height: u32, threads: usize) -> RenderResult<Self> {
        if threads == 0 {
            return Err(RenderError::NoThreads);
        }
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyViewport { width, height });
        }

        let count = threads.min(height as usize);
        let (result_tx, results) = mpsc::channel();

        let mut workers = Vec::with_capacity(count);
        for band in partition_rows(height, count) {
            let (job_tx, job_rx) = mpsc::sync_channel(1);
            let to_pool = result_tx.clone();
            let id = band.index;

            let handle = thread::Builder::new()
                .name(format!("rtc-worker-{id}"))
                .spawn(move || run_worker(id, job_rx, to_pool))?;

            workers.push(Worker {
                band,
                pixels: vec![0; band.pixel_count(width)],
                jobs: Some(job_tx),
                handle: Some(handle),
            });
        }

        log::info!("Render pool: {count} workers for {width}x{height}");

        Ok(Self {
            width,
            height,
            workers,
            results,
            frames_rendered: 0,
        })
    }

    /// Start one worker per logical core.
    pub fn with_default_threads(width: u32, height: u32) -> RenderResult<Self> {
        Self::new(width, height, num_cpus::get())
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.workers.iter().map(|w| &w.band)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Render `frame` into `framebuffer`, blocking until every band is done.
    pub fn render_frame(
        &mut self,
        frame: Arc<Frame>,
        framebuffer: &mut Framebuffer,
    ) -> RenderResult<()> {
        let expected = self.width as usize * self.height as usize;
        if frame.width != self.width || frame.height != self.height {
            return Err(RenderError::FramebufferMismatch {
                expected,
                actual: frame.pixel_count(),
            });
        }
        if framebuffer.width() != self.width || framebuffer.height() != self.height {
            return Err(RenderError::FramebufferMismatch {
                expected,
                actual: framebuffer.pixels().len(),
            });
        }

        let start = Instant::now();

        let mut pending = vec![false; self.workers.len()];
        for (id, worker) in self.workers.iter_mut().enumerate() {
            let job = Job {
                frame: Arc::clone(&frame),
                band: worker.band,
                pixels: mem::take(&mut worker.pixels),
            };
            let sent = worker
                .jobs
                .as_ref()
                .map_or(false, |jobs| jobs.send(Some(job)).is_ok());
            if !sent {
                return Err(RenderError::WorkerDisconnected(id));
            }
            pending[id] = true;
        }

        let mut outcome = Ok(());
        let mut remaining = pending.len();
        while remaining > 0 {
            let done = match self.results.recv_timeout(POLL_INTERVAL) {
                Ok(done) => done,
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(id) = self.first_dead(&pending) {
                        return Err(RenderError::WorkerDisconnected(id));
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let id = pending.iter().position(|&p| p).unwrap_or_default();
                    return Err(RenderError::WorkerDisconnected(id));
                }
            };

            let worker = &mut self.workers[done.worker];
            let band = worker.band;
            worker.pixels = done.pixels;
            pending[done.worker] = false;
            remaining -= 1;

            match done.result {
                Ok(()) => {
                    if let Some(rows) = framebuffer.rows_mut(band.y, band.height) {
                        rows.copy_from_slice(&worker.pixels);
                    }
                }
                Err(e) => {
                    log::warn!("Render worker {}: band failed: {e}", done.worker);
                    if outcome.is_ok() {
                        outcome = Err(e);
                    }
                }
            }
        }

        outcome?;

        framebuffer.set_format(frame.settings.pixel_format);
        self.frames_rendered += 1;
        log::debug!(
            "Frame {} rendered in {:.2}ms",
            self.frames_rendered,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(())
    }

    fn first_dead(&self, pending: &[bool]) -> Option<usize> {
        pending
            .iter()
            .zip(&self.workers)
            .position(|(&p, worker)| p && worker.is_dead())
    }
}

impl Drop for RenderPool {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            if let Some(jobs) = worker.jobs.take() {
                // A worker that already exited has dropped its receiver
                let _ = jobs.send(None);
            }
        }
        for (id, worker) in self.workers.iter_mut().enumerate() {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    log::error!("Render worker {id} panicked");
                }
            }
        }
        log::debug!("Render pool: shut down after {} frames", self.frames_rendered);
    }
}

fn run_worker(id: usize, jobs: Receiver<Option<Job>>, to_pool: Sender<BandResult>) {
    log::debug!("Render worker {id}: begin");

    while let Ok(Some(job)) = jobs.recv() {
        let Job {
            frame,
            band,
            mut pixels,
        } = job;
        log::trace!("Render worker {id}: rows {}..{}", band.y, band.end());

        let result = render_band(&frame, &band, &mut pixels);
        let done = BandResult {
            worker: id,
            pixels,
            result,
        };
        if to_pool.send(done).is_err() {
            break;
        }
    }

    log::debug!("Render worker {id}: end");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render, Camera, PixelFormat, RenderSettings};
    use rtc_core::{Color, Material, Scene};
    use rtc_math::{Quat, Sphere, Vec3};
    use std::f32::consts::FRAC_PI_2;

    fn four_sphere_scene(sky: Color) -> Arc<Scene> {
        let mut scene = Scene::new(sky);
        let grey = scene.add_material(Material::default()).unwrap();
        let gold = scene
            .add_material(Material::metal(Color::new(1.0, 0.8, 0.2), 0.3))
            .unwrap();
        let lamp = scene
            .add_material(Material::default().with_emissive(3.0))
            .unwrap();

        let spheres = [
            (Vec3::new(5.0, -2.0, 0.0), grey),
            (Vec3::new(5.0, 0.0, -2.0), gold),
            (Vec3::new(5.0, 0.0, 2.0), grey),
            (Vec3::new(5.0, 2.0, 0.0), lamp),
        ];
        for (center, material) in spheres {
            scene
                .add_sphere(Sphere::new(center, 1.0).unwrap(), material)
                .unwrap();
        }
        Arc::new(scene)
    }

    fn make_frame(scene: Arc<Scene>, yaw: f32, seed: u64, width: u32, height: u32) -> Arc<Frame> {
        let camera = Camera::new(
            Quat::from_rotation_y(yaw),
            Vec3::ZERO,
            60.0,
            0.01,
            1000.0,
            width,
            height,
        )
        .unwrap();
        let settings = RenderSettings {
            supersamples: 1,
            max_bounces: 2,
            seed,
            pixel_format: PixelFormat::Srgba8,
        };
        Arc::new(Frame::new(scene, camera, settings, width, height).unwrap())
    }

    #[test]
    fn test_pool_matches_single_thread() {
        let scene = four_sphere_scene(Color::new(0.5, 0.0, 1.0));
        let frame = make_frame(scene, -FRAC_PI_2, 3, 20, 13);

        let mut expected = Framebuffer::new(20, 13, PixelFormat::Srgba8);
        render(&frame, &mut expected).unwrap();

        for threads in [1, 2, 3, 4, 7] {
            let mut pool = RenderPool::new(20, 13, threads).unwrap();
            let mut actual = Framebuffer::new(20, 13, PixelFormat::Srgba8);
            pool.render_frame(Arc::clone(&frame), &mut actual).unwrap();
            assert_eq!(actual.pixels(), expected.pixels(), "threads {threads}");
        }
    }

    #[test]
    fn test_pool_reused_across_frames() {
        let scene = four_sphere_scene(Color::new(0.5, 0.0, 1.0));
        let mut pool = RenderPool::new(16, 12, 4).unwrap();

        for (i, yaw) in [-FRAC_PI_2, -1.4, -1.7].into_iter().enumerate() {
            let frame = make_frame(Arc::clone(&scene), yaw, i as u64, 16, 12);

            let mut expected = Framebuffer::new(16, 12, PixelFormat::Srgba8);
            render(&frame, &mut expected).unwrap();

            let mut actual = Framebuffer::new(16, 12, PixelFormat::Srgba8);
            pool.render_frame(frame, &mut actual).unwrap();
            assert_eq!(actual.pixels(), expected.pixels(), "frame {i}");
        }

        assert_eq!(pool.frames_rendered(), 3);
    }

    #[test]
    fn test_pool_caps_threads_to_rows() {
        let pool = RenderPool::new(8, 3, 16).unwrap();
        assert_eq!(pool.thread_count(), 3);
        assert!(pool.bands().all(|b| b.height == 1));
    }

    #[test]
    fn test_pool_rejects_bad_input() {
        assert!(matches!(RenderPool::new(8, 8, 0), Err(RenderError::NoThreads)));
        assert!(matches!(
            RenderPool::new(0, 8, 2),
            Err(RenderError::EmptyViewport { .. })
        ));
    }

    #[test]
    fn test_pool_rejects_mismatched_frame() {
        let scene = four_sphere_scene(Color::ZERO);
        let mut pool = RenderPool::new(8, 8, 2).unwrap();
        let mut framebuffer = Framebuffer::new(8, 8, PixelFormat::Srgba8);

        let result = pool.render_frame(make_frame(scene, 0.0, 0, 8, 4), &mut framebuffer);
        assert!(matches!(
            result,
            Err(RenderError::FramebufferMismatch { expected: 64, actual: 32 })
        ));
        assert_eq!(pool.frames_rendered(), 0);
    }

    #[test]
    fn test_pool_default_threads() {
        let pool = RenderPool::with_default_threads(4, 64).unwrap();
        assert_eq!(pool.thread_count(), num_cpus::get().min(64));
    }
}
