use crate::model::Region;

/// Canned overview text for a region.
#[must_use]
pub fn summary(region: Region) -> &'static str {
    match region {
        Region::Back => {
            "The back forms the central support structure of the body, housing the vertebral column, spinal cord, and associated muscles. It provides both strength and flexibility, allowing bending, twisting, and maintaining upright posture. The vertebrae protect the spinal cord while supporting the weight of the head and trunk."
        }
        Region::Thorax => {
            "The thorax, or chest, is enclosed by the rib cage, sternum, and thoracic vertebrae. It contains the lungs, heart, and major blood vessels that sustain respiration and circulation. The diaphragm separates it from the abdomen and plays a key role in breathing movements."
        }
        Region::Abdomen => {
            "The abdomen is the region between the thorax and pelvis that contains the digestive organs such as the stomach, intestines, liver, and pancreas. It is a dynamic cavity that supports digestion, absorption, and metabolic regulation. Its wall muscles also assist in posture and protection of internal organs."
        }
        Region::Pelvis => {
            "The pelvis connects the trunk to the lower limbs and provides strong support for the body's weight during standing and movement. It houses parts of the digestive, urinary, and reproductive systems. Structurally, it protects these organs and transmits forces from the spine to the legs."
        }
        Region::Perineum => {
            "The perineum is the diamond-shaped region forming the pelvic outlet, located between the thighs. It contains muscles and fascia that support the pelvic organs and control urination and defecation. In both sexes, it plays an essential role in reproductive and sexual function."
        }
        Region::UpperLimb => {
            "The upper limb includes the shoulder, arm, forearm, and hand, designed for mobility and precision. It allows grasping, lifting, and manipulation of objects through a wide range of motion. Its muscular and skeletal structure enables fine motor control and sensory feedback for skilled tasks."
        }
        Region::LowerLimb => {
            "The lower limb includes the hip, thigh, leg, and foot, providing stability and locomotion. It supports the entire body weight during standing and movement. The strong bones, ligaments, and muscles work together to enable walking, running, and balance on uneven surfaces."
        }
        Region::Neck => {
            "The neck is the narrow region connecting the head and trunk, containing vital structures such as the trachea, esophagus, and major blood vessels. It supports the head's mobility and provides passage for nerves and vessels to and from the brain. Muscles of the neck also assist in breathing and posture."
        }
        Region::Head => {
            "The head houses the brain, sensory organs, and the openings for the respiratory and digestive tracts. It contains the eyes, ears, nose, and mouth, which mediate sensory perception and communication. The skull protects the brain while providing attachment points for facial and chewing muscles."
        }
    }
}
