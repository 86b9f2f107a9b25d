use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

use galena_shared::coords::ChunkPos;

use crate::materials::MaterialRegistry;
use crate::mesher::{combine_fragments, quads_to_fragments, CombinedMesh, MeshError, SurfaceQuad};

/// One background meshing request. `version` is the world manager's
/// edit counter for the chunk; a completion carrying a stale version is
/// dropped by the caller, which is the whole cancellation model.
pub struct MeshJob {
    pub chunk_pos: ChunkPos,
    pub name: String,
    pub quads: Vec<SurfaceQuad>,
    pub materials: Arc<MaterialRegistry>,
    pub version: u64,
}

pub type MeshJobResult = (ChunkPos, Result<Option<CombinedMesh>, MeshError>, u64);

/// Runs fragment generation and mesh combination off the render path.
pub struct MeshWorker {
    pool: ThreadPool,
    completed_rx: Receiver<MeshJobResult>,
    completed_tx: Sender<MeshJobResult>,
}

impl MeshWorker {
    pub fn new() -> Self {
        let available = std::thread::available_parallelism()
            .map(|parallelism| parallelism.get())
            .unwrap_or(4);
        Self::with_threads(available.saturating_sub(1).clamp(2, 8))
    }

    pub fn with_threads(worker_threads: usize) -> Self {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_threads.max(1))
            .thread_name(|index| format!("mesh-worker-{index}"))
            .build()
            .expect("failed to create mesh worker thread pool");
        let (completed_tx, completed_rx) = mpsc::channel();

        Self {
            pool,
            completed_rx,
            completed_tx,
        }
    }

    pub fn submit(&self, job: MeshJob) {
        let completed_tx = self.completed_tx.clone();
        self.pool.spawn(move || {
            let result = quads_to_fragments(job.chunk_pos, &job.quads, &job.materials)
                .map(|fragments| combine_fragments(&fragments, &job.name));

            if let Err(err) = &result {
                warn!(chunk = %job.name, %err, "mesh pass failed");
            }

            let _ = completed_tx.send((job.chunk_pos, result, job.version));
        });
    }

    /// Drains finished jobs without blocking.
    pub fn poll(&self) -> Vec<MeshJobResult> {
        let mut completed = Vec::new();
        while let Ok(result) = self.completed_rx.try_recv() {
            completed.push(result);
        }
        completed
    }
}

impl Default for MeshWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{MeshJob, MeshJobResult, MeshWorker};
    use crate::materials::{register_default_materials, LightingVariant, MaterialVariant};
    use crate::mesher::{MeshError, QuadGeometry, SurfaceQuad};
    use galena_shared::block::BlockId;
    use galena_shared::coords::{ChunkPos, PaddedPos};

    fn sample_quad(block: BlockId) -> SurfaceQuad {
        SurfaceQuad {
            coords: PaddedPos { x: 2, y: 1, z: 1 },
            geometry: QuadGeometry {
                corners: [
                    [0.0, 1.0, 0.0],
                    [1.0, 1.0, 0.0],
                    [1.0, 1.0, 1.0],
                    [0.0, 1.0, 1.0],
                ],
                normal: [0.0, 1.0, 0.0],
                uv: [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            },
            block,
            material: MaterialVariant::Top,
            lighting: LightingVariant::Lit,
        }
    }

    fn poll_until_complete(worker: &MeshWorker, count: usize) -> Vec<MeshJobResult> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while results.len() < count && Instant::now() < deadline {
            results.extend(worker.poll());
            if results.len() < count {
                thread::sleep(Duration::from_millis(5));
            }
        }
        results
    }

    #[test]
    fn completed_jobs_carry_their_version_through() {
        let _ = tracing_subscriber::fmt().with_target(false).try_init();

        let worker = MeshWorker::with_threads(2);
        let materials = Arc::new(register_default_materials());

        worker.submit(MeshJob {
            chunk_pos: ChunkPos::new(1, 0, 0),
            name: "1:0:0".to_string(),
            quads: vec![sample_quad(BlockId::GRASS)],
            materials: Arc::clone(&materials),
            version: 7,
        });

        let results = poll_until_complete(&worker, 1);
        assert_eq!(results.len(), 1);

        let (chunk_pos, result, version) = &results[0];
        assert_eq!(*chunk_pos, ChunkPos::new(1, 0, 0));
        assert_eq!(*version, 7);

        let mesh = result
            .as_ref()
            .expect("registered material")
            .as_ref()
            .expect("non-empty quads");
        assert_eq!(mesh.name, "1:0:0");
        assert_eq!(mesh.vertices.len(), 4);
    }

    #[test]
    fn empty_and_failing_jobs_still_complete() {
        let worker = MeshWorker::with_threads(2);
        let materials = Arc::new(register_default_materials());

        worker.submit(MeshJob {
            chunk_pos: ChunkPos::new(0, 0, 0),
            name: "0:0:0".to_string(),
            quads: Vec::new(),
            materials: Arc::clone(&materials),
            version: 1,
        });
        worker.submit(MeshJob {
            chunk_pos: ChunkPos::new(0, 1, 0),
            name: "0:1:0".to_string(),
            quads: vec![sample_quad(BlockId(900))],
            materials,
            version: 2,
        });

        let mut results = poll_until_complete(&worker, 2);
        assert_eq!(results.len(), 2);
        results.sort_by_key(|(_, _, version)| *version);

        let (_, empty_result, _) = &results[0];
        assert!(matches!(empty_result, Ok(None)));

        let (_, failed_result, _) = &results[1];
        assert!(matches!(
            failed_result,
            Err(MeshError::MissingMaterial { block, .. }) if *block == BlockId(900)
        ));
    }
}
