//! `MergeFace(edge)`: given one edge of a shared boundary,
//! finds the maximal run of consecutive edges whose twins all border
//! the same neighbour face `G`, removes that whole run, folds `G`'s
//! remaining edges into this face, and deletes `G`. Shared verts that
//! were only touched by the dissolved run are removed with it.
//!
//! Generalizes `EdgeMesh::dissolve_edge`'s merge branch (a run of length
//! one) to an arbitrary consecutive run, following the same
//! `prev`/`next` splice: the edge before the run on this side connects
//! to `G`'s edge just past the far end of the run, and vice versa.

use crate::edge::Edge;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::ids::{EdgeId, FaceId, VertId};
use crate::mesh::EdgeMesh;
use crate::vert::Vert;

use super::Command;

pub struct MergeFace {
    edge: EdgeId,

    this_face: Option<FaceId>,
    g_face: Option<FaceId>,
    run: Vec<EdgeId>,
    twins: Vec<EdgeId>,
    run_prev: Option<EdgeId>,
    run_next: Option<EdgeId>,
    g_before: Option<EdgeId>,
    g_after: Option<EdgeId>,
    removed_run_edges: Vec<(EdgeId, Edge)>,
    removed_twin_edges: Vec<(EdgeId, Edge)>,
    reassigned_g_edges: Vec<EdgeId>,
    removed_verts: Vec<(VertId, Vert)>,
    removed_g_face: Option<Face>,
    orig_this_face: Option<Face>,
    orig_run_prev: Option<Edge>,
    orig_run_next: Option<Edge>,
}

impl MergeFace {
    pub fn new(edge: EdgeId) -> Self {
        MergeFace {
            edge,
            this_face: None,
            g_face: None,
            run: Vec::new(),
            twins: Vec::new(),
            run_prev: None,
            run_next: None,
            g_before: None,
            g_after: None,
            removed_run_edges: Vec::new(),
            removed_twin_edges: Vec::new(),
            reassigned_g_edges: Vec::new(),
            removed_verts: Vec::new(),
            removed_g_face: None,
            orig_this_face: None,
            orig_run_prev: None,
            orig_run_next: None,
        }
    }
}

impl Command for MergeFace {
    fn can_do(&self, mesh: &EdgeMesh) -> bool {
        match mesh.edge(self.edge) {
            Some(e) => e.twin.map_or(false, |t| mesh.edge(t).unwrap().face != e.face),
            None => false,
        }
    }

    fn do_cmd(&mut self, mesh: &mut EdgeMesh) -> MeshResult<()> {
        let e = *mesh.edge(self.edge).ok_or_else(|| MeshError::Precondition("MergeFace: edge missing".into()))?;
        let t0 = e.twin.ok_or_else(|| MeshError::Precondition("MergeFace: edge has no twin".into()))?;
        let this_face = e.face;
        let g_face = mesh.edge(t0).unwrap().face;
        if g_face == this_face {
            return Err(MeshError::Precondition("MergeFace: edge's twin already borders the same face".into()));
        }

        let mut run = vec![self.edge];
        let mut cur = self.edge;
        loop {
            let nxt = mesh.edge(cur).unwrap().next;
            match mesh.edge(nxt).unwrap().twin {
                Some(tw) if mesh.edge(tw).unwrap().face == g_face && !run.contains(&nxt) => {
                    run.push(nxt);
                    cur = nxt;
                }
                _ => break,
            }
        }
        cur = self.edge;
        loop {
            let prv = mesh.edge(cur).unwrap().prev;
            match mesh.edge(prv).unwrap().twin {
                Some(tw) if mesh.edge(tw).unwrap().face == g_face && !run.contains(&prv) => {
                    run.insert(0, prv);
                    cur = prv;
                }
                _ => break,
            }
        }

        let twins: Vec<EdgeId> = run.iter().map(|&r| mesh.edge(r).unwrap().twin.unwrap()).collect();
        let run_prev = mesh.edge(*run.first().unwrap()).unwrap().prev;
        let run_next = mesh.edge(*run.last().unwrap()).unwrap().next;
        let t_first = *twins.first().unwrap();
        let t_last = *twins.last().unwrap();
        let g_before = mesh.edge(t_last).unwrap().prev;
        let g_after = mesh.edge(t_first).unwrap().next;

        self.orig_run_prev = Some(*mesh.edge(run_prev).unwrap());
        self.orig_run_next = Some(*mesh.edge(run_next).unwrap());
        self.orig_this_face = mesh.face(this_face).cloned();

        // Splice this face's boundary straight into `G`'s, skipping the
        // whole dissolved run on both sides.
        mesh.edge_mut(run_prev).unwrap().next = g_after;
        mesh.edge_mut(g_after).unwrap().prev = run_prev;
        mesh.edge_mut(g_before).unwrap().next = run_next;
        mesh.edge_mut(run_next).unwrap().prev = g_before;

        let g_face_rec = mesh.face(g_face).cloned().ok_or_else(|| MeshError::Precondition("MergeFace: neighbour face missing".into()))?;
        for &oe in &g_face_rec.edges {
            if !twins.contains(&oe) {
                mesh.edge_mut(oe).unwrap().face = this_face;
                self.reassigned_g_edges.push(oe);
            }
        }

        // Internal joints of the run (not the two outer endpoints) are
        // orphaned once the run's edges are gone, unless another
        // surviving edge still originates there.
        let internal_verts: Vec<VertId> = run[..run.len().saturating_sub(1)].iter().map(|&r| mesh.edge(r).unwrap().next).map(|n| mesh.edge(n).unwrap().vert).collect();
        let doomed: Vec<EdgeId> = run.iter().chain(twins.iter()).copied().collect();
        for v in internal_verts {
            let still_used = mesh.edges().any(|(id, edge)| edge.vert == v && !doomed.contains(&id));
            if !still_used {
                if let Some((vert, id)) = mesh.remove_vert(v) {
                    self.removed_verts.push((id, vert));
                }
            }
        }

        for &r in &run {
            if let Some(edge) = mesh.remove_edge(r) {
                self.removed_run_edges.push((r, edge));
            }
        }
        for &tw in &twins {
            if let Some(edge) = mesh.remove_edge(tw) {
                self.removed_twin_edges.push((tw, edge));
            }
        }

        let new_loop = mesh.edge_loop(g_after);
        let f = mesh.face_mut(this_face).unwrap();
        f.edge = g_after;
        f.edges = new_loop;

        self.removed_g_face = mesh.remove_face(g_face);

        self.this_face = Some(this_face);
        self.g_face = Some(g_face);
        self.run = run;
        self.twins = twins;
        self.run_prev = Some(run_prev);
        self.run_next = Some(run_next);
        self.g_before = Some(g_before);
        self.g_after = Some(g_after);

        log::debug!("MergeFace: folded {} into {}, dissolving a run of {} edges", g_face, this_face, self.run.len());
        mesh.debug_assert_valid();
        Ok(())
    }

    fn undo(&mut self, mesh: &mut EdgeMesh) {
        let this_face = self.this_face.take().expect("MergeFace::undo: not done");
        let g_face = self.g_face.take().unwrap();

        mesh.insert_face(g_face, self.removed_g_face.take().unwrap());

        for &(id, edge) in self.removed_twin_edges.iter().rev() {
            mesh.insert_edge(id, edge);
        }
        for &(id, edge) in self.removed_run_edges.iter().rev() {
            mesh.insert_edge(id, edge);
        }
        self.removed_twin_edges.clear();
        self.removed_run_edges.clear();

        for &(id, ref vert) in self.removed_verts.iter().rev() {
            mesh.insert_vert(id, vert.clone());
        }
        self.removed_verts.clear();

        for &oe in &self.reassigned_g_edges {
            mesh.edge_mut(oe).unwrap().face = g_face;
        }
        self.reassigned_g_edges.clear();

        *mesh.edge_mut(self.run_prev.take().unwrap()).unwrap() = self.orig_run_prev.take().unwrap();
        *mesh.edge_mut(self.run_next.take().unwrap()).unwrap() = self.orig_run_next.take().unwrap();

        // `g_after`/`g_before` themselves were never removed, only
        // spliced; their `prev`/`next` must point back at the
        // now-reinstated twins rather than at the run's neighbours.
        let t_first = *self.twins.first().unwrap();
        let t_last = *self.twins.last().unwrap();
        mesh.edge_mut(self.g_after.take().unwrap()).unwrap().prev = t_first;
        mesh.edge_mut(self.g_before.take().unwrap()).unwrap().next = t_last;

        *mesh.face_mut(this_face).unwrap() = self.orig_this_face.take().unwrap();
        self.run.clear();
        self.twins.clear();
        mesh.debug_assert_valid();
    }
}
