//! Ping-pong buffer schedule of the blur passes and the per-frame pass
//! graph derived from it.

use super::params::{GodraysParams, BLUR_PASSES};

/// One of the effect's single-channel mask buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskSlot {
    /// Full-resolution mask written by the depth-mask pass.
    Occlusion,
    /// Quarter-resolution ping-pong buffer A.
    Ping,
    /// Quarter-resolution ping-pong buffer B.
    Pong,
}

impl MaskSlot {
    /// The opposite ping-pong buffer. `Occlusion` has no partner and
    /// hands off to `Pong`, the first blur target.
    #[must_use]
    pub fn partner(self) -> Self {
        match self {
            Self::Occlusion | Self::Ping => Self::Pong,
            Self::Pong => Self::Ping,
        }
    }
}

/// A single radial blur pass: read `source`, write `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurStep {
    /// 1-based pass number, the exponent of the step-size sequence.
    pub pass_index: u32,
    /// Buffer sampled by this pass.
    pub source: MaskSlot,
    /// Buffer written by this pass.
    pub target: MaskSlot,
    /// Texture-space distance between taps.
    pub step_size: f32,
}

/// The fixed three-pass blur schedule.
///
/// Pass 1 reads the occlusion buffer into `Pong`, then each pass reads the
/// previous target and writes its partner, so source and target always
/// differ and the last target feeds the combine pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurSchedule {
    steps: [BlurStep; BLUR_PASSES],
}

impl BlurSchedule {
    /// Schedule for the given parameters' step sizes.
    #[must_use]
    pub fn new(params: &GodraysParams) -> Self {
        let step_sizes = params.step_sizes();
        let mut source = MaskSlot::Occlusion;
        let steps = std::array::from_fn(|i| {
            let target = source.partner();
            let step = BlurStep {
                pass_index: i as u32 + 1,
                source,
                target,
                step_size: step_sizes[i],
            };
            source = target;
            step
        });
        Self { steps }
    }

    /// Passes in execution order.
    pub fn steps(&self) -> &[BlurStep; BLUR_PASSES] {
        &self.steps
    }

    /// Buffer holding the final blurred mask.
    pub fn combine_source(&self) -> MaskSlot {
        self.steps[BLUR_PASSES - 1].target
    }
}

/// A GPU resource touched by the per-frame pass sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameResource {
    /// Scene depth buffer, written by geometry outside the effect.
    SceneDepth,
    /// HDR scene color buffer.
    SceneColor,
    /// One of the mask buffers.
    Mask(MaskSlot),
    /// The caller's output view.
    Output,
}

/// One node of the per-frame pass graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PassNode {
    /// Debug label, also used for the wgpu render pass.
    pub label: &'static str,
    /// Resources sampled.
    pub reads: Vec<FrameResource>,
    /// Resource rendered into.
    pub writes: FrameResource,
}

/// Labels of the blur passes, indexed by `pass_index - 1`.
pub const BLUR_LABELS: [&str; BLUR_PASSES] =
    ["Godrays Blur 1", "Godrays Blur 2", "Godrays Blur 3"];

/// The post-geometry pass sequence: depth mask, three blurs, combine.
///
/// The fake-sun pass runs before geometry and is not part of this graph.
#[must_use]
pub fn frame_graph(schedule: &BlurSchedule) -> Vec<PassNode> {
    let mut nodes = Vec::with_capacity(BLUR_PASSES + 2);
    nodes.push(PassNode {
        label: "Godrays Depth Mask",
        reads: vec![FrameResource::SceneDepth],
        writes: FrameResource::Mask(MaskSlot::Occlusion),
    });
    for step in schedule.steps() {
        nodes.push(PassNode {
            label: BLUR_LABELS[step.pass_index as usize - 1],
            reads: vec![FrameResource::Mask(step.source)],
            writes: FrameResource::Mask(step.target),
        });
    }
    nodes.push(PassNode {
        label: "Godrays Combine",
        reads: vec![
            FrameResource::SceneColor,
            FrameResource::Mask(schedule.combine_source()),
        ],
        writes: FrameResource::Output,
    });
    nodes
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn schedule() -> BlurSchedule {
        BlurSchedule::new(&GodraysParams::default())
    }

    #[test]
    fn blur_order_matches_ping_pong_layout() {
        let steps = schedule().steps().map(|s| (s.source, s.target));
        assert_eq!(
            steps,
            [
                (MaskSlot::Occlusion, MaskSlot::Pong),
                (MaskSlot::Pong, MaskSlot::Ping),
                (MaskSlot::Ping, MaskSlot::Pong),
            ]
        );
    }

    #[test]
    fn no_pass_reads_its_own_target() {
        for step in schedule().steps() {
            assert_ne!(step.source, step.target, "pass {}", step.pass_index);
        }
    }

    #[test]
    fn each_pass_reads_previous_target() {
        let s = schedule();
        for pair in s.steps().windows(2) {
            assert_eq!(pair[1].source, pair[0].target);
        }
        assert_eq!(s.combine_source(), s.steps()[BLUR_PASSES - 1].target);
        assert_eq!(s.combine_source(), MaskSlot::Pong);
    }

    #[test]
    fn step_sizes_decrease_through_schedule() {
        let s = schedule();
        let sizes: Vec<f32> = s.steps().iter().map(|st| st.step_size).collect();
        assert!(sizes.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(
            s.steps().map(|st| st.pass_index),
            [1, 2, 3]
        );
    }

    #[test]
    fn frame_graph_reads_only_what_was_written_earlier() {
        let graph = frame_graph(&schedule());
        let mut written: HashSet<FrameResource> =
            [FrameResource::SceneDepth, FrameResource::SceneColor]
                .into_iter()
                .collect();
        for node in &graph {
            for read in &node.reads {
                assert!(
                    written.contains(read),
                    "{} reads {read:?}",
                    node.label
                );
                assert_ne!(*read, node.writes, "{} aliases", node.label);
            }
            let _ = written.insert(node.writes);
        }
        assert_eq!(graph.len(), BLUR_PASSES + 2);
        assert_eq!(graph.last().map(|n| n.writes), Some(FrameResource::Output));
    }
}
